use clap::Parser;
use env_logger::Env;
use log::debug;
use std::path::PathBuf;
use std::process;
use tm_engine::{Configuration, Halt, ProgramManager, SpecLoader, TuringMachine, TuringMachineError};

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  tm-cli --machine machines/palindrome.json -i 0110 -i 01
  tm-cli --builtin Doubler --run -i 000")]
struct Cli {
    /// The machine specification file (.json) to execute
    #[clap(
        short,
        long,
        conflicts_with = "builtin",
        required_unless_present_any = ["builtin", "list"]
    )]
    machine: Option<PathBuf>,

    /// The name of a built-in machine to execute
    #[clap(short, long)]
    builtin: Option<String>,

    /// List the built-in machines and exit
    #[clap(short, long)]
    list: bool,

    /// An input string; repeat to run a batch
    #[clap(short, long)]
    input: Vec<String>,

    /// Print the output string instead of accept/reject
    #[clap(short, long)]
    run: bool,

    /// Print every configuration of the execution
    #[clap(short, long)]
    trace: bool,

    /// The maximum number of steps per input
    #[clap(long, default_value_t = tm_engine::MAX_STEPS)]
    max_steps: usize,

    /// Enable debug logging
    #[clap(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if cli.list {
        for name in ProgramManager::list_program_names() {
            println!("{}", name);
        }
        return;
    }

    let machine = match load_machine(&cli) {
        Ok(machine) => machine.with_max_steps(cli.max_steps),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    for input in &cli.input {
        if let Err(e) = run_input(&machine, input, &cli) {
            println!("{}: error: {}", input, e);
        }
    }
}

fn load_machine(cli: &Cli) -> Result<TuringMachine, TuringMachineError> {
    let spec = match (&cli.machine, &cli.builtin) {
        (Some(path), _) => SpecLoader::load_spec(path)?,
        (None, Some(name)) => ProgramManager::get_program_by_name(name)?,
        (None, None) => unreachable!("clap requires --machine or --builtin"),
    };

    let machine = TuringMachine::from_spec(spec)?;
    debug!(
        "Loaded {} with {} tapes",
        machine.definition().name().unwrap_or("unnamed machine"),
        machine.definition().num_tapes()
    );
    Ok(machine)
}

fn run_input(machine: &TuringMachine, input: &str, cli: &Cli) -> Result<(), TuringMachineError> {
    let config = if cli.trace {
        trace(machine, input, |step, config| println!("{:>6}: {}", step, config))?
    } else {
        machine.final_config(input)?
    };

    let result = match config.halt() {
        None => "limit reached".to_string(),
        Some(_) if cli.run => config.output(),
        Some(Halt::Accept) => "accept".to_string(),
        Some(Halt::Reject) => "reject".to_string(),
    };

    debug!("{:?} finished in state {}", input, config.state());
    println!("{}: {}", input, result);
    Ok(())
}

/// Steps through the execution, handing every configuration to `visit` as it is reached.
fn trace(
    machine: &TuringMachine,
    input: &str,
    mut visit: impl FnMut(usize, &Configuration),
) -> Result<Configuration, TuringMachineError> {
    let mut config = machine.initial_config(input)?;
    let mut steps = 0;
    visit(steps, &config);

    while !config.is_halted() && steps < machine.max_steps() {
        config.step();
        steps += 1;
        visit(steps, &config);
    }

    Ok(config)
}
