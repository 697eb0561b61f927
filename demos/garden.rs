use std::path::PathBuf;

use garden_views::prelude::*;

fn main() {
    // Optional first argument: path to an EditorConfig JSON file.
    let path = std::env::args().nth(1).map(PathBuf::from);
    let (config, report) = EditorConfig::load_or_default(path.as_deref());
    if let Some(report) = report {
        eprintln!("falling back to default config: {report:?}");
    }

    let mut garden = GardenContext::from_config(&config);
    let beds = [
        ("Lavender", PlantPosition::new(-3.0, 0.0, -2.0), PlantColor(0x9b7fd4)),
        ("Rosemary", PlantPosition::new(2.5, 0.0, -1.0), PlantColor(0x5a8f5a)),
        ("Apple tree", PlantPosition::new(0.0, 1.5, 3.0), PlantColor(0xc0392b)),
    ];
    for (name, position, color) in beds {
        garden.plants.create_plant(name, position, Some(color));
    }

    run_editor(config, garden);
}
