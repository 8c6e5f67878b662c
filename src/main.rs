mod cli;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    azops::runtime::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(invocation) = cli::parse_invoke_args(&args)? else {
        cli::print_help();
        return Ok(());
    };

    let code = cli::handle_invoke(invocation).await?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
