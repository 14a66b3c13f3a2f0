use std::io;

#[cfg(unix)]
fn main() -> io::Result<()> {
    let config = ofo_shell::EnvConfig::from_env();
    if let Some(path) = config.log_file.as_deref() {
        ofo_shell::logging::init_file_logging(path)?;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(ofo_terminal::app::run(config))
}

#[cfg(not(unix))]
fn main() -> io::Result<()> {
    Err(io::Error::other("ofo needs a unix terminal"))
}
