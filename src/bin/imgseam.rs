// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{App, Arg};
use imgseam::SeamCarver;
use log::info;

fn main() -> Result<(), failure::Error> {
    env_logger::init();

    let matches = App::new("imgseam")
        .version("0.1.0")
        .about("Content-aware image shrinking")
        .arg(
            Arg::with_name("INPUT")
                .help("The image to carve")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .help("Where to write the result")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .takes_value(true)
                .help("Target width in pixels (default: no width change)"),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .takes_value(true)
                .help("Target height in pixels (default: no height change)"),
        )
        .arg(
            Arg::with_name("energy")
                .long("energy")
                .help("Write the energy map as a grayscale image instead of carving"),
        )
        .get_matches();

    let input = matches.value_of("INPUT").unwrap();
    let output = matches.value_of("OUTPUT").unwrap();

    let source = image::open(input)?.to_rgb8();
    let mut carver = SeamCarver::new(&source)?;

    if matches.is_present("energy") {
        carver.energy_image().save(output)?;
        return Ok(());
    }

    let target_width = match matches.value_of("width") {
        Some(w) => w.parse()?,
        None => carver.width(),
    };
    let target_height = match matches.value_of("height") {
        Some(h) => h.parse()?,
        None => carver.height(),
    };

    info!(
        "carving {}x{} down to {}x{}",
        carver.width(),
        carver.height(),
        target_width,
        target_height
    );
    carver.carve_to(target_width, target_height)?;
    carver.snapshot().save(output)?;
    Ok(())
}
