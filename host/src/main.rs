use maze_core::Maze;
use maze_pilot::{
    discover_routes, load_maze, Command, CommandLink, LinkConfig, PilotConfig, PilotError, RouteBook,
    SerialTransport, TcpTransport, Transport,
};
use std::env;
use std::fs;

fn main() {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let config = PilotConfig::from_env().unwrap_or_else(|e| {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    });

    let command = &args[1];

    let result = match command.as_str() {
        "routes" => {
            if args.len() < 3 {
                eprintln!("Usage: {} routes <maze_file> [--max <n>] [output_file]", args[0]);
                std::process::exit(1);
            }

            let mut config = config;
            let mut output_file_idx = 3;

            if args.len() > 3 && args[3] == "--max" {
                if args.len() < 5 {
                    eprintln!("❌ Error: --max requires a value");
                    std::process::exit(1);
                }
                config.discovery.max_routes = args[4].parse().unwrap_or_else(|_| {
                    eprintln!("❌ Error: Invalid route count '{}'. Must be a non-negative integer.", args[4]);
                    std::process::exit(1);
                });
                output_file_idx = 5;
            }

            let output_file = args.get(output_file_idx).map(|s| s.as_str());
            routes_command(&config, &args[2], output_file)
        }

        "generate" => {
            if args.len() < 5 {
                eprintln!("Usage: {} generate <rows> <cols> <seed> [output_file]", args[0]);
                std::process::exit(1);
            }

            let rows = parse_arg::<usize>(&args[2], "rows");
            let cols = parse_arg::<usize>(&args[3], "cols");
            let seed = parse_arg::<u32>(&args[4], "seed");
            generate_command(rows, cols, seed, args.get(5).map(|s| s.as_str()))
        }

        "send" => {
            if args.len() < 3 {
                eprintln!("Usage: {} send <command> [--port <device>] [--baud <rate>] [--address <host:port>]", args[0]);
                std::process::exit(1);
            }

            let mut config = config;
            link_flags(&args[3..], &mut config.link);
            send_command(&config, &args[2])
        }

        "save" => {
            if args.len() < 4 {
                eprintln!("Usage: {} save <maze_file> <rank> [--port <device>] [--baud <rate>] [--address <host:port>]", args[0]);
                std::process::exit(1);
            }

            let mut config = config;
            let rank = parse_arg::<usize>(&args[3], "rank");
            link_flags(&args[4..], &mut config.link);
            save_command(&config, &args[2], rank)
        }

        _ => {
            eprintln!("❌ Unknown command: {}", command);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn parse_arg<T: std::str::FromStr>(value: &str, name: &str) -> T {
    value.parse().unwrap_or_else(|_| {
        eprintln!("❌ Error: Invalid {} '{}'. Must be a non-negative integer.", name, value);
        std::process::exit(1);
    })
}

/// Apply `--port`, `--baud` and `--address` overrides to the link config.
fn link_flags(flags: &[String], link: &mut LinkConfig) {
    let mut i = 0;
    while i < flags.len() {
        let Some(value) = flags.get(i + 1) else {
            eprintln!("❌ Error: {} requires a value", flags[i]);
            std::process::exit(1);
        };
        match flags[i].as_str() {
            "--port" => link.port = Some(value.clone()),
            "--baud" => link.baud_rate = parse_arg::<u32>(value, "baud rate"),
            "--address" => {
                link.address = value.clone();
                link.port = None;
            }
            other => {
                eprintln!("❌ Error: Unknown option '{}'", other);
                std::process::exit(1);
            }
        }
        i += 2;
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [options]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  routes <maze_file> [--max <n>] [output_file]");
    eprintln!("      Find up to n distinct routes through a maze and compile them");
    eprintln!("      - maze_file: Text file, '#' wall, ' ' path, 'S' start, 'E' end");
    eprintln!("      - --max: Number of routes to collect (default: 6)");
    eprintln!("      - output_file: Optional file to save the routes (JSON)");
    eprintln!();
    eprintln!("  generate <rows> <cols> <seed> [output_file]");
    eprintln!("      Generate a perfect maze in the text format above");
    eprintln!();
    eprintln!("  send <command> [--port <device>] [--baud <rate>] [--address <host:port>]");
    eprintln!("      Send one command to the robot and print its feedback");
    eprintln!("      - command: FLR instructions, !S<instructions>, !E or !C");
    eprintln!("      - --port: Serial device of the robot, e.g. /dev/ttyUSB0");
    eprintln!("      - --baud: Serial baud rate (default: 9600)");
    eprintln!("      - --address: Serial-to-network bridge, used instead of --port");
    eprintln!();
    eprintln!("  save <maze_file> <rank> [--port <device>] [--baud <rate>] [--address <host:port>]");
    eprintln!("      Store the route at <rank> (0 = shortest) on the robot");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MAZE_PILOT_CONFIG  JSON config file (serial port, timings, max routes)");
    eprintln!("  RUST_LOG           Log filter (default: info)");
    eprintln!();
    eprintln!("Example workflow:");
    eprintln!("  1. Find routes:   {} routes maze.txt", program);
    eprintln!("  2. Store one:     {} save maze.txt 0 --port /dev/ttyUSB0", program);
    eprintln!("  3. Run it:        {} send !E --port /dev/ttyUSB0", program);
}

fn print_routes(routes: &RouteBook) {
    for (rank, route) in routes.iter().enumerate() {
        println!("[{}] {} ({} cells)", rank, route.name, route.cell_count());
        println!("    instructions: {}", route.instructions);
    }
}

fn routes_command(config: &PilotConfig, maze_file: &str, output_file: Option<&str>) -> Result<(), PilotError> {
    let maze = load_maze(maze_file, config.alphabet)?;
    let routes = discover_routes(&maze, &config.discovery)?;

    if routes.is_empty() {
        println!("No route found through {}", maze_file);
        return Ok(());
    }

    println!("✅ Found {} routes (shortest first):", routes.len());
    print_routes(&routes);

    if let Some(output_file) = output_file {
        let json = serde_json::to_string_pretty(&routes).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e)
        });
        match json.and_then(|json| fs::write(output_file, json)) {
            Ok(()) => println!("💾 Routes saved to {}", output_file),
            Err(e) => eprintln!("⚠️  Could not save routes to {}: {}", output_file, e),
        }
    }

    Ok(())
}

fn generate_command(rows: usize, cols: usize, seed: u32, output_file: Option<&str>) -> Result<(), PilotError> {
    let text = Maze::generate(rows, cols, seed).to_rows().join("\n");

    match output_file {
        Some(output_file) => match fs::write(output_file, format!("{}\n", text)) {
            Ok(()) => println!("💾 Maze saved to {}", output_file),
            Err(e) => eprintln!("⚠️  Could not save maze to {}: {}", output_file, e),
        },
        None => println!("{}", text),
    }

    Ok(())
}

fn dispatch(config: &PilotConfig, command: &Command) -> Result<(), PilotError> {
    match &config.link.port {
        Some(port) => {
            let transport = SerialTransport::open(port, config.link.baud_rate)?;
            run_on_link(CommandLink::new(transport, config.link.clone()), command)
        }
        None => {
            let transport = TcpTransport::connect(&config.link.address)?;
            run_on_link(CommandLink::new(transport, config.link.clone()), command)
        }
    }
}

fn run_on_link<T: Transport>(mut link: CommandLink<T>, command: &Command) -> Result<(), PilotError> {
    for greeting in link.settle() {
        println!("robot (startup): {}", greeting);
    }

    let feedback = link.dispatch(&command.to_string())?;
    for line in &feedback {
        println!("robot: {}", line);
    }
    println!("✅ Feedback window closed ({} lines)", feedback.len());
    Ok(())
}

fn send_command(config: &PilotConfig, text: &str) -> Result<(), PilotError> {
    let command: Command = text.parse()?;
    dispatch(config, &command)
}

fn save_command(config: &PilotConfig, maze_file: &str, rank: usize) -> Result<(), PilotError> {
    let maze = load_maze(maze_file, config.alphabet)?;
    let routes = discover_routes(&maze, &config.discovery)?;
    print_routes(&routes);

    let command = routes.save_command(rank)?;
    println!("📤 Storing route {} on the robot: {}", rank, command);
    dispatch(config, &command)
}
