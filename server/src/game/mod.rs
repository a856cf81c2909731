use std::{error::Error, sync::mpsc, thread};

use bevy::{
    app::{self, FixedUpdate, Startup},
    ecs::schedule::{IntoSystemSetConfigs, SystemSet},
    log::{self, LogPlugin},
    time::{Fixed, Time},
    MinimalPlugins,
};
use clap::{Parser, ValueEnum};

pub mod actions;
pub mod alignment;
pub mod events;
pub mod mana;
pub mod physics;
pub mod replication;
pub mod scenes;

/// Defines ordering of system processing across the game server.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServerSets {
    ActionStart,       // start & stop requests
    ActionProcessing,  // running actions, which queue effects (e.g. 10 mana to Bob)
    EffectApplication, // application of queued effects
    Replication,       // notifying clients
}

#[derive(Parser, Debug)]
#[command(version, about = "Authoritative server running mana aura actions")]
pub struct ServerArgs {
    /// Fixed simulation steps per second
    #[arg(long, default_value_t = 10.0)]
    pub tick_hz: f64,

    #[arg(long, value_enum, default_value_t = LogLevel::Debug)]
    pub log_level: LogLevel,

    /// Spawn a caster running a mana aura among a few allies & a foe
    #[arg(long)]
    pub demo: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for log::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => log::Level::TRACE,
            LogLevel::Debug => log::Level::DEBUG,
            LogLevel::Info => log::Level::INFO,
            LogLevel::Warn => log::Level::WARN,
            LogLevel::Error => log::Level::ERROR,
        }
    }
}

pub fn run_game_server(args: ServerArgs) -> Result<(), Box<dyn Error>> {
    if !args.tick_hz.is_finite() || args.tick_hz <= 0.0 {
        return Err(format!("tick rate must be positive, got {}", args.tick_hz).into());
    }
    let action_database = actions::get_action_database()?;

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        replication::drain_client_packets(rx);
    });

    let mut app = app::App::new();
    app.add_plugins((
        MinimalPlugins,
        LogPlugin {
            filter: "".into(),
            level: args.log_level.into(),
            update_subscriber: None,
        },
        events::GameEventsPlugin,
        actions::ActionPlugin,
        mana::ManaPlugin,
        replication::ReplicationPlugin,
    ))
    .configure_sets(
        FixedUpdate,
        (
            ServerSets::ActionStart,
            ServerSets::ActionProcessing,
            ServerSets::EffectApplication,
            ServerSets::Replication,
        )
            .chain(),
    )
    .insert_resource(action_database)
    .insert_resource(replication::ClientBroadcaster::new(tx))
    .insert_resource(Time::<Fixed>::from_hz(args.tick_hz));

    if args.demo {
        app.add_systems(Startup, scenes::sys_spawn_demo);
    }
    app.run();
    Ok(())
}
