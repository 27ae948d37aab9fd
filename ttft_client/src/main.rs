use pico_args::Arguments;
use tracing::info;
use ttft::LatencyProbe;
use ttft_client::Args;

const HELP: &str = "\
Measure time to first token of a streaming chat completion

USAGE:
  ttft_client [OPTIONS]

OPTIONS:
  --config  Config file path    [default: $TTFT_CONFIG_PATH or <config dir>/ttft/config.json]
  --model   Model override
  --system  System prompt override
  --user    User prompt override

FLAGS:
  -h, --help    Print help information
";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        println!("{}", HELP);
        std::process::exit(0);
    }

    let args = Args {
        config_path: pargs.opt_value_from_str("--config")?,
        model: pargs.opt_value_from_str("--model")?,
        system_prompt: pargs.opt_value_from_str("--system")?,
        user_prompt: pargs.opt_value_from_str("--user")?,
    };
    let (client, request) = ttft_client::init(args)?;

    let probe = LatencyProbe::new(client);
    let measurement = probe.measure(&request).await?;
    info!(
        "received {} fragments (usage={:?})",
        measurement.fragments, measurement.usage
    );
    println!("{measurement}");
    Ok(())
}
