use maxrects::{Bin, MaxRectsPacker, PackingLogic, PackingOptions, Rectangle};

fn main() {
    env_logger::init();

    let options = PackingOptions {
        smart: true,
        power_of_two: true,
        border: 2.0,
        logic: PackingLogic::MaxEdge,
        ..PackingOptions::default()
    };

    let mut packer = MaxRectsPacker::new(1024.0f32, 1024.0, 1.0, options);

    let inputs: Vec<_> = [(100.0, 150.0), (200.0, 200.0), (50.0, 75.0), (300.0, 100.0), (80.0, 120.0)]
        .iter()
        .enumerate()
        .map(|(i, &size)| Rectangle::with_data(size, i))
        .collect();

    packer.add_batch(inputs);

    println!(
        "Packed {} rectangles into {} bins",
        packer.all_rects().len(),
        packer.bins().len()
    );

    for (i, bin) in packer.bins().iter().enumerate() {
        println!(
            "Bin {}: {}x{} with {} rectangles",
            i,
            bin.width(),
            bin.height(),
            bin.rects().len()
        );

        for rect in bin.rects() {
            println!(
                "  Rect: {}x{} at ({},{}) data: {}",
                rect.width(),
                rect.height(),
                rect.x(),
                rect.y(),
                rect.data()
            );
        }
    }
}
