fn main() -> anyhow::Result<()> {
    sw_cli::run()
}
