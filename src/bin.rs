use simple_polygons::run;

/// Entry point for the application.
///
/// The first argument is the configuration file to replay.
fn main() -> anyhow::Result<()> {
    run(std::env::args().nth(1))
}
