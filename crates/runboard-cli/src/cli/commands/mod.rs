use super::args::*;

pub mod chart;
pub mod demo;
pub mod summary;
pub mod update;
pub mod validate;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Update(args) => update::run(args).await,
        Command::Summary(args) => summary::run(args).await,
        Command::Chart(args) => chart::run(args).await,
        Command::Validate(args) => validate::run(args).await,
        Command::Demo(args) => demo::run(args).await,
    }
}
