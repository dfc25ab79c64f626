fn main() -> anyhow::Result<()> {
    walletforge_cli::run()?;
    Ok(())
}
