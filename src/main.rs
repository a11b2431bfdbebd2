mod simulation;

use clap::Parser;

#[derive(Parser)]
#[command(name = "elevator_sim")]
#[command(about = "Elevator dispatch simulation, headless")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "600")]
    ticks: u32,

    /// Time delta per tick in seconds
    #[arg(long, default_value = "0.1")]
    delta: f32,

    /// Number of elevator cars
    #[arg(long, default_value = "1")]
    cars: usize,

    /// Number of floors
    #[arg(long, default_value = "6")]
    floors: i32,

    /// Cabin travel speed in world units per second
    #[arg(long, default_value = "8.0")]
    speed: f32,

    /// Door hold interval in seconds
    #[arg(long, default_value = "1.0")]
    door_hold: f32,

    /// Ticks between randomly generated calls (0 disables traffic)
    #[arg(long, default_value = "30")]
    call_interval: u32,

    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = simulation::SimConfig {
        car_count: cli.cars,
        floor_count: cli.floors,
        speed: cli.speed,
        door_hold_secs: cli.door_hold,
    };

    let mut world = match cli.seed {
        Some(seed) => simulation::SimWorld::new_with_seed(config, seed)?,
        None => simulation::SimWorld::new(config)?,
    };

    println!("Running elevator simulation in headless mode...");
    println!(
        "Ticks: {}, Delta: {}s, Cars: {}, Floors: {}",
        cli.ticks, cli.delta, cli.cars, cli.floors
    );
    println!();

    let events = world.subscribe();

    // Calculate how many ticks equal 1 second of simulation time
    let ticks_per_second = (1.0 / cli.delta).ceil() as u32;

    let mut tick = 0;
    while tick < cli.ticks {
        // Run ticks_per_second ticks (or remaining ticks if fewer)
        let ticks_to_run = ticks_per_second.min(cli.ticks - tick);

        for _ in 0..ticks_to_run {
            tick += 1;
            if cli.call_interval > 0 && tick % cli.call_interval == 0 {
                world.spawn_random_call();
            }
            world.tick(cli.delta);
        }

        // Print a summary after running 1 second worth of ticks
        println!(
            "--- After tick {} ({:.1}s simulated time) ---",
            tick,
            tick as f32 * cli.delta
        );
        world.print_summary();
        for event in events.try_iter() {
            println!("  event: {:?}", event);
        }
        println!();

        if tick < cli.ticks {
            std::thread::sleep(std::time::Duration::from_millis(200));
        }
    }

    println!("=== Final State ===");
    world.print_summary();
    Ok(())
}
