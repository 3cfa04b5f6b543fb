use anyhow::Result;

fn main() -> Result<()> {
    chatlab::cli::run()
}
