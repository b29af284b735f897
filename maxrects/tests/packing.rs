use std::fmt::Write;

use maxrects::{
    AnyBin, Bin, MaxRectsBin, MaxRectsPacker, PackingLogic, PackingOptions, Rectangle,
};

fn assert_no_overlap<D>(bin: &AnyBin<u32, D>) {
    let rects = bin.rects();

    for (i, a) in rects.iter().enumerate() {
        for b in &rects[i + 1..] {
            assert!(
                !a.collides_with(b),
                "{:?} at {:?} overlaps {:?} at {:?}",
                a.size(),
                a.position(),
                b.size(),
                b.position()
            );
        }
    }
}

fn assert_inside<D>(bin: &AnyBin<u32, D>) {
    for rect in bin.rects() {
        let max = rect.max();
        assert!(max.0 <= bin.width() && max.1 <= bin.height());
    }
}

fn describe(packer: &MaxRectsPacker<u32, &str>) -> String {
    let mut output = String::new();

    for (i, bin) in packer.bins().iter().enumerate() {
        writeln!(output, "bin {} ({}x{})", i, bin.width(), bin.height()).unwrap();

        for rect in bin.rects() {
            writeln!(
                output,
                "  {}: {}x{} at ({}, {})",
                rect.data(),
                rect.width(),
                rect.height(),
                rect.x(),
                rect.y()
            )
            .unwrap();
        }
    }

    output
}

fn sprites() -> Vec<Rectangle<u32, &'static str>> {
    vec![
        Rectangle::with_data((100, 150), "a"),
        Rectangle::with_data((200, 200), "b"),
        Rectangle::with_data((50, 75), "c"),
        Rectangle::with_data((300, 100), "d"),
        Rectangle::with_data((80, 120), "e"),
    ]
}

#[test]
fn sprites_share_one_power_of_two_bin() {
    let _ = env_logger::try_init();

    let options = PackingOptions {
        smart: true,
        power_of_two: true,
        ..PackingOptions::default()
    };
    let mut packer = MaxRectsPacker::new(1024, 1024, 0, options);

    for rect in sprites() {
        packer.add_rect(rect).unwrap();
    }

    assert_eq!(packer.bins().len(), 1);

    let bin = &packer.bins()[0];
    assert_eq!(bin.rects().len(), 5);
    assert!(bin.width().is_power_of_two());
    assert!(bin.height().is_power_of_two());

    let right = bin.rects().iter().map(|rect| rect.max().0).max().unwrap();
    let bottom = bin.rects().iter().map(|rect| rect.max().1).max().unwrap();
    assert!(bin.width() >= right);
    assert!(bin.height() >= bottom);

    assert_no_overlap(bin);
    assert_inside(bin);
}

#[test]
fn batch_layout() {
    let options = PackingOptions {
        smart: true,
        power_of_two: true,
        logic: PackingLogic::MaxEdge,
        ..PackingOptions::default()
    };
    let mut packer = MaxRectsPacker::new(1024, 1024, 0, options);
    packer.add_batch(sprites());

    insta::assert_snapshot!(describe(&packer), @r###"
    bin 0 (512x512)
      d: 300x100 at (0, 0)
      b: 200x200 at (300, 0)
      a: 100x150 at (0, 100)
      e: 80x120 at (100, 100)
      c: 50x75 at (180, 200)
    "###);
}

#[test]
fn large_squares_need_several_bins() {
    let options = PackingOptions {
        smart: false,
        power_of_two: false,
        ..PackingOptions::default()
    };
    let mut packer = MaxRectsPacker::new(600, 600, 0, options);

    packer.add(512, 512, "first");
    packer.add(512, 512, "second");
    packer.add(512, 512, "third");

    assert!(packer.bins().len() >= 2);
    for bin in packer.bins() {
        assert_no_overlap(bin);
        assert_inside(bin);
    }
}

#[test]
fn oversized_rectangles_are_isolated() {
    let options = PackingOptions {
        allow_rotation: true,
        ..PackingOptions::default()
    };
    let mut packer = MaxRectsPacker::new(256, 256, 0, options);

    packer.add(64, 64, "small");
    let handle = packer.add(300, 1000, "huge").unwrap();
    packer.add(64, 64, "small again");

    let bin = &packer.bins()[handle.bin];
    assert!(bin.is_oversized());
    assert_eq!(bin.rects().len(), 1);
    assert!(bin.rects()[0].is_oversized());
    assert_eq!((bin.width(), bin.height()), (300, 1000));

    assert_eq!(packer.all_rects().len(), 3);
}

#[test]
fn next_forces_a_fresh_bin() {
    let mut packer = MaxRectsPacker::new(1024, 1024, 0, PackingOptions::default());

    let first = packer.add(64, 64, "page one").unwrap();
    packer.next();
    let second = packer.add(64, 64, "page two").unwrap();

    assert_eq!(first.bin, 0);
    assert_eq!(second.bin, 1);
    assert!(packer.bins()[0].rects().len() == 1);
}

#[test]
fn dirty_flag_clears_and_returns() {
    let mut packer = MaxRectsPacker::new(256, 256, 0, PackingOptions::default());
    packer.add(10, 10, "one");

    packer.set_dirty(false);
    assert!(!packer.is_dirty());

    packer.add(10, 10, "two");
    assert!(packer.is_dirty());
}

#[test]
fn repack_then_readd_restores_count() {
    let options = PackingOptions {
        smart: false,
        power_of_two: false,
        logic: PackingLogic::BestShortSide,
        ..PackingOptions::default()
    };
    let mut bin = MaxRectsBin::new(128, 128, 0, options);

    for i in 0..16 {
        bin.add(Rectangle::with_data((32, 32), i)).unwrap();
    }
    let before = bin.rects().len();

    bin.rects_mut()[5].set_width(100);
    bin.rects_mut()[9].set_height(90);

    let evicted = bin.repack();
    assert!(!evicted.is_empty());

    let mut spill = MaxRectsBin::new(256, 256, 0, options);
    for rect in evicted {
        spill.add(rect).unwrap();
    }

    assert_eq!(bin.rects().len() + spill.rects().len(), before);
}

#[test]
fn full_repack_invalidates_handles_but_keeps_rectangles() {
    let options = PackingOptions {
        smart: true,
        power_of_two: false,
        ..PackingOptions::default()
    };
    let mut packer = MaxRectsPacker::new(256, 256, 0, options);

    let small = packer.add(16, 16, "small").unwrap();
    packer.add(200, 200, "large");

    packer.get_mut(small).unwrap().set_width(20);
    packer.repack(false);

    // The larger rectangle is packed first now, so the old handle points at
    // it instead.
    assert_eq!(*packer.get(small).unwrap().data(), "large");

    let names: Vec<&str> = packer.all_rects().iter().map(|rect| *rect.data()).collect();
    assert_eq!(names, vec!["large", "small"]);
    for bin in packer.bins() {
        assert_no_overlap(bin);
    }
}

#[test]
fn clone_snapshot_survives_speculative_repack() {
    let mut packer = MaxRectsPacker::new(128, 128, 0, PackingOptions::default());
    for _ in 0..4 {
        packer.add(64, 64, "tile");
    }

    let snapshot = packer.clone();

    let first = maxrects::RectHandle { bin: 0, index: 0 };
    packer.get_mut(first).unwrap().set_width(128);
    packer.repack(true);

    assert_eq!(snapshot.bins().len(), 1);
    assert_eq!(snapshot.get(first).unwrap().size(), (64, 64));
    assert_eq!(packer.all_rects().len(), 4);
}
