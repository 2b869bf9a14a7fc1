mod cli;
mod db;
mod email;
mod error;
mod fmt;
mod models;
mod normalize;
#[cfg(feature = "pdf")]
mod pdf;
mod periods;
mod report;
mod seeder;
mod settings;
mod store;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "pdf")]
use cli::ExportCommands;
use cli::{ChecklistCommands, Cli, Commands, ComplexCommands, DraftCommands, MasterCommands};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init {
            data_dir,
            agent,
            no_template,
        } => cli::init::run(data_dir, agent, no_template),
        Commands::Complex { command } => match command {
            ComplexCommands::Add {
                name,
                complex_type,
                take_on,
                year_end,
                building_code,
                address,
                previous_agent,
                previous_agent_email,
                portfolio_manager,
            } => cli::complex::add(cli::complex::NewComplex {
                name,
                complex_type,
                take_on,
                year_end,
                building_code,
                address,
                previous_agent,
                previous_agent_email,
                portfolio_manager,
            }),
            ComplexCommands::List => cli::complex::list(),
            ComplexCommands::Show { name } => cli::complex::show(&name),
            ComplexCommands::Finalize { name } => cli::complex::finalize(&name),
        },
        Commands::Master { command } => match command {
            MasterCommands::Add {
                task,
                category,
                responsibility,
                heading,
            } => cli::master::add(&task, &category, responsibility, heading),
            MasterCommands::List => cli::master::list(),
            MasterCommands::Update {
                task,
                category,
                responsibility,
                heading,
            } => cli::master::update(&task, category, responsibility, heading),
            MasterCommands::Delete { task } => cli::master::delete(&task),
            MasterCommands::Import { file } => cli::master::import(&file),
        },
        Commands::Checklist { command } => match command {
            ChecklistCommands::Show {
                complex,
                outstanding,
            } => cli::checklist::show(&complex, outstanding),
            ChecklistCommands::Receive { complex, task, date } => {
                cli::checklist::receive(&complex, &task, date)
            }
            ChecklistCommands::Unreceive { complex, task } => cli::checklist::unreceive(&complex, &task),
            ChecklistCommands::Note {
                complex,
                task,
                notes,
            } => cli::checklist::note(&complex, &task, &notes),
            ChecklistCommands::Assign { complex, task, by } => cli::checklist::assign(&complex, &task, &by),
            ChecklistCommands::Add {
                complex,
                task,
                heading,
                responsibility,
            } => cli::checklist::add(&complex, &task, &heading, &responsibility),
            ChecklistCommands::Delete { complex, task } => cli::checklist::delete(&complex, &task),
            ChecklistCommands::Import { complex, file } => cli::checklist::import(&complex, &file),
        },
        Commands::Periods { take_on, year_end } => cli::periods::run(&take_on, &year_end),
        #[cfg(feature = "pdf")]
        Commands::Export { command } => match command {
            ExportCommands::Handover { complex, output } => {
                cli::export::handover(&complex, output).map(|_| ())
            }
            ExportCommands::Status { complex, output } => cli::export::status(&complex, output).map(|_| ()),
        },
        Commands::Draft { command } => match command {
            DraftCommands::Handover { complex, mark_sent } => cli::draft::handover(&complex, mark_sent),
            DraftCommands::Status { complex, mark_sent } => cli::draft::status(&complex, mark_sent),
        },
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
