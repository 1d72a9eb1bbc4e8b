use apsystems_ecu::prelude::*;

fn main() -> Result<()> {
    let options = Options::new();

    apsystems_ecu::app(options)
}
