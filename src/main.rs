//! stamp's main application entry point.
//! Parses the command line, loads the session of the current directory, runs the
//! requested command and saves the session when it changed.

use stamp::{
    cli::{get_args, Args, Command},
    config::Settings,
    error::{default_error_handler, Result},
    generator::GenerateOutcome,
    logger::init_logger,
    model::{AddOutcome, RemoveOutcome, SessionModel},
    prompt::DialoguerPrompter,
    template::TemplateResult,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    let verbose = args.verbose;
    if let Err(err) = run(args) {
        default_error_handler(err, verbose);
    }
}

fn print_status(model: &SessionModel) -> Result<()> {
    let Some(session) = model.session() else {
        println!("No session in progress.");
        if let Some(base_dir) = model.base_dir() {
            println!("Run 'stamp start <name>' to start one in '{}'.", base_dir.display());
        }
        return Ok(());
    };

    if let Some(path) = model.session_path() {
        println!("Session file:      {}", path.display());
    }
    println!("Generator name:    {}", session.name);
    println!(
        "Subject word:      {}",
        session.subject_word.as_deref().unwrap_or("(not set, run 'stamp use-name <word>')")
    );
    println!(
        "Parent directory:  {}",
        if session.generate_parent_directory { "on" } else { "off" }
    );

    let templates = model.templates()?;
    println!("Included files:    {}", templates.len());
    for template in &templates {
        if template.is_binary {
            println!("  {} (binary)", template.rel_path);
        } else {
            println!(
                "  {} ({} lines changed) -> {}",
                template.rel_path,
                template.replacement_count(),
                template.destination
            );
        }
    }
    Ok(())
}

fn print_template(template: &TemplateResult) {
    println!("== {} -> {}", template.rel_path, template.file_name());
    print!("{}", template.header);
    if template.is_binary {
        println!("(binary file, not templatized)");
        return;
    }
    for record in &template.replacements {
        println!("{:>5}: {}", record.line_number, record.original_text);
        println!("{:>5}> {}", "", record.replaced_text);
    }
    println!();
}

/// Main application logic execution.
///
/// # Flow
/// 1. Builds settings from the environment and command line
/// 2. Loads the session found in the current directory or its parents
/// 3. Runs the command
/// 4. Saves the session if the command changed it
fn run(args: Args) -> Result<()> {
    let mut settings = Settings::from_env();
    if let Some(session_file) = args.session_file {
        settings.session_file_name = session_file;
    }
    let prompt = DialoguerPrompter::new();

    let mut model = SessionModel::new(settings);
    model.load_if_exists(".")?;

    match args.command {
        Command::Start { name } => {
            model.start(&name)?;
            println!("Started a session for generator '{name}'.");
        }
        Command::Rename { name } => {
            if model.rename(&name)? {
                println!("Generator renamed to '{name}'.");
            } else {
                println!("Generator is already named '{name}'.");
            }
        }
        Command::Abort { yes } => {
            if let Some(session_path) = model.confirm_abort(&prompt, yes)? {
                println!("Session aborted, '{}' deleted.", session_path.display());
            }
            return Ok(());
        }
        Command::Add { recursive, paths } => {
            for (path, outcome) in model.add(paths.as_slice(), recursive.into())? {
                match outcome {
                    AddOutcome::Added => println!("Added: '{path}'"),
                    AddOutcome::AlreadyIncluded => println!("Already included: '{path}'"),
                    AddOutcome::SkippedBinary => println!("Skipped binary file: '{path}'"),
                    AddOutcome::Ignored => println!("Ignored: '{path}'"),
                }
            }
        }
        Command::Remove { paths } => {
            for (path, outcome) in model.remove(paths.as_slice())? {
                match outcome {
                    RemoveOutcome::Removed => println!("Removed: '{path}'"),
                    RemoveOutcome::NotIncluded => println!("Not included: '{path}'"),
                }
            }
        }
        Command::UseName { word } => {
            if model.use_name(&word)? {
                println!("Using '{word}' as the subject word.");
            } else {
                println!("Already using '{word}' as the subject word.");
            }
        }
        Command::ParentDir { state } => {
            let enabled: bool = state.into();
            model.set_generate_parent_dir(enabled)?;
            println!("Parent directory generation {}.", if enabled { "on" } else { "off" });
        }
        Command::Status => print_status(&model)?,
        Command::Show { paths } => {
            let templates = if paths.is_empty() {
                model.templates()?
            } else {
                paths.iter().map(|p| model.template_for(p)).collect::<Result<Vec<_>>>()?
            };
            templates.iter().for_each(print_template);
        }
        Command::Generate { force } => match model.generate(force)? {
            GenerateOutcome::Unchanged { generator_dir } => {
                println!("Generator in '{}' is unchanged.", generator_dir.display());
            }
            GenerateOutcome::Generated { generator_dir, files, backup } => {
                if let Some(backup) = backup {
                    println!("Previous generator moved to '{}'.", backup.display());
                }
                for file in &files {
                    println!("Wrote: '{}'", file.display());
                }
                println!(
                    "Generator written to '{}', {} template files.",
                    generator_dir.display(),
                    files.len()
                );
            }
        },
    }

    model.save_if_changed()?;
    Ok(())
}
