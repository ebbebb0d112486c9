fn main() -> anyhow::Result<()> {
    cobragen::cli::run_cli()
}
