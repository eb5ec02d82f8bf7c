use std::env;

use radiotherm::{start, ThermostatConfig};

#[tokio::main]
async fn main() -> radiotherm::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let ip = args.get(1).expect("usage: monitor <ip> [--hold]");
    let mut config = ThermostatConfig::new(ip);
    config.hold_temp = args.iter().any(|a| a == "--hold");

    println!("Connecting to {ip}...");
    let running = start(&config, |builder| {
        builder
            .on_event(|event| {
                println!("{event:?}");
            })
            .on_state(|state| {
                println!(
                    "{:.1}\u{00b0}F | mode: {} | action: {:?} | target: {:?} | fan: {}{}",
                    state.current_temperature,
                    state.hvac_mode,
                    state.hvac_action,
                    state.target_temperature,
                    state.fan_mode,
                    if state.hold_is_set { " | HOLD" } else { "" },
                );
            })
    })
    .await?;

    let description = running.thermostat.description();
    println!(
        "Connected to {} ({}, firmware {}). Polling for updates...",
        description.name, description.device.model, description.device.fw_version
    );

    if let Err(e) = running.poller.await {
        eprintln!("Poller stopped: {e}");
    }
    Ok(())
}
