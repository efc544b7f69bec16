fn main() -> anyhow::Result<()> {
    let summary = whack_a_mole::run()?;
    println!("{summary}");
    Ok(())
}
