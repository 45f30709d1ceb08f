fn main() -> anyhow::Result<()> {
    tenkiconv::cli::run_cli()
}
