mod effects;
mod host;
mod logging;

fn main() -> anyhow::Result<()> {
    logging::initialize(logging::LogDestination::File);

    let options = host::Options::parse(std::env::args())?;
    host::run(options)
}
