use augury::adapter::inbound::cli::command::Cli;
use augury::adapter::inbound::cli::{dispatch, operator, output};
use augury::infrastructure::operator::entry::Operator;
use clap::Parser;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if operator::install(Box::new(Operator::new())).is_err() {
        output::error("operator already installed");
        std::process::exit(1);
    }

    if let Err(e) = dispatch::execute(cli).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
