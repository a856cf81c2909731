use std::error::Error;

use clap::Parser;

mod game;

fn main() -> Result<(), Box<dyn Error>> {
    let args = game::ServerArgs::parse();
    game::run_game_server(args)?;
    Ok(())
}
