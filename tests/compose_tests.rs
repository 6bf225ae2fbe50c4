#[cfg(test)]
mod compose_proptests {
    use image::{Rgba, RgbaImage};
    use proptest::prelude::*;

    use artqr::*;

    pub fn strategy_strategy() -> BoxedStrategy<BlendStrategy> {
        prop_oneof![
            Just(BlendStrategy::Conservative),
            Just(BlendStrategy::ReadableArt),
            Just(BlendStrategy::Badge),
            Just(BlendStrategy::Classic),
        ]
        .boxed()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn proptest_protected_regions_survive(
            strategy in strategy_strategy(),
            color in any::<[u8; 4]>(),
            canvas in 62u32..160,
        ) {
            let symbol = SymbolBuilder::new(b"proptest").build(canvas).unwrap();
            let art = RgbaImage::from_pixel(97, 131, Rgba(color));
            let out = compose(&symbol.image, &art, strategy, canvas).unwrap();

            prop_assert_eq!(out.dimensions(), (canvas, canvas));
            for r in compute_protected_regions(canvas) {
                for y in r.y..r.bottom() {
                    for x in r.x..r.right() {
                        prop_assert_eq!(out.get_pixel(x, y), symbol.image.get_pixel(x, y));
                    }
                }
            }
        }

        #[test]
        fn proptest_dark_modules_stay_dark(
            strategy in prop_oneof![
                Just(BlendStrategy::Conservative),
                Just(BlendStrategy::ReadableArt),
                Just(BlendStrategy::Classic),
            ],
            color in any::<[u8; 3]>(),
        ) {
            let symbol = SymbolBuilder::new(b"dark stays dark").build(124).unwrap();
            let art = RgbaImage::from_pixel(124, 124, Rgba([color[0], color[1], color[2], 255]));
            let out = compose(&symbol.image, &art, strategy, 124).unwrap();
            for (x, y, px) in symbol.image.enumerate_pixels() {
                if px[0] == 0 {
                    prop_assert_eq!(*out.get_pixel(x, y), *px);
                }
            }
        }
    }
}

#[cfg(test)]
mod compose_tests {
    use std::f32::consts::PI;

    use image::{Rgba, RgbaImage};
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use test_case::test_case;

    use artqr::{
        blend::BlendZone,
        codec::{from_data_url, to_data_url},
        common::color::{brightness, BLACK},
        compose, compute_protected_regions, BlendStrategy, CompositionOptions, Compositor,
        QRReader, SymbolBuilder,
    };

    const URL: &str = "https://example.com";

    fn solid(s: u32, rgb: [u8; 3]) -> RgbaImage {
        RgbaImage::from_pixel(s, s, Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    fn noise(s: u32, base: [u8; 3], amp: i32, seed: u64) -> RgbaImage {
        let mut rng = StdRng::seed_from_u64(seed);
        RgbaImage::from_fn(s, s, |_, _| {
            let mut px = [0u8, 0, 0, 255];
            for i in 0..3 {
                px[i] = (base[i] as i32 + rng.random_range(-amp..=amp)).clamp(0, 255) as u8;
            }
            Rgba(px)
        })
    }

    fn blocks(s: u32, cells: u32, lo: u8, hi: u8, seed: u64) -> RgbaImage {
        let mut rng = StdRng::seed_from_u64(seed);
        let palette: Vec<Rgba<u8>> = (0..cells * cells)
            .map(|_| {
                Rgba([rng.random_range(lo..=hi), rng.random_range(lo..=hi), rng.random_range(lo..=hi), 255])
            })
            .collect();
        let small = RgbaImage::from_fn(cells, cells, |x, y| palette[(y * cells + x) as usize]);
        image::imageops::resize(&small, s, s, image::imageops::FilterType::Nearest)
    }

    fn hard_checkerboard(s: u32, cell: u32) -> RgbaImage {
        RgbaImage::from_fn(s, s, |x, y| {
            let v = if (x / cell + y / cell) % 2 == 0 { 0 } else { 255 };
            Rgba([v, v, v, 255])
        })
    }

    // Sky over ground with a bright sun and grain, roughly what a photo throws at the scanner
    fn photo(s: u32, seed: u64) -> RgbaImage {
        let mut rng = StdRng::seed_from_u64(seed);
        let f = s as f32;
        RgbaImage::from_fn(s, s, |x, y| {
            let (fx, fy) = (x as f32 / f, y as f32 / f);
            let base = if fy < 0.55 {
                [70.0 + 120.0 * fy, 130.0 + 90.0 * fy, 230.0 - 40.0 * fy]
            } else {
                [60.0 + 50.0 * fx, 110.0 - 60.0 * fy, 30.0]
            };
            let (dx, dy) = (fx - 0.7, fy - 0.25);
            let sun = if dx * dx + dy * dy < 0.01 { 255.0 } else { 0.0 };
            let mut px = [0u8, 0, 0, 255];
            for i in 0..3 {
                let grain = rng.random_range(-60.0..=60.0);
                px[i] = (base[i] + grain).max(sun).clamp(0.0, 255.0) as u8;
            }
            Rgba(px)
        })
    }

    fn sweep_arts(s: u32) -> Vec<(&'static str, RgbaImage)> {
        let f = s as f32;
        vec![
            ("mid gray", solid(s, [128, 128, 128])),
            ("red", solid(s, [200, 60, 60])),
            ("navy", solid(s, [30, 40, 110])),
            ("black", solid(s, [0, 0, 0])),
            ("white", solid(s, [255, 255, 255])),
            ("yellow", solid(s, [245, 225, 80])),
            (
                "horizontal gradient",
                RgbaImage::from_fn(s, s, |x, _| Rgba([(x * 255 / s) as u8, 120, 180, 255])),
            ),
            (
                "vertical gradient",
                RgbaImage::from_fn(s, s, |_, y| Rgba([90, (y * 255 / s) as u8, 150, 255])),
            ),
            (
                "diagonal gradient",
                RgbaImage::from_fn(s, s, |x, y| {
                    let t = ((x + y) * 255 / (2 * s)) as u8;
                    Rgba([t, 255 - t, 128, 255])
                }),
            ),
            (
                "radial gradient",
                RgbaImage::from_fn(s, s, |x, y| {
                    let (dx, dy) = (x as f32 - f / 2.0, y as f32 - f / 2.0);
                    let t = ((dx * dx + dy * dy).sqrt() / f * 255.0).min(255.0) as u8;
                    Rgba([255 - t, 140, t, 255])
                }),
            ),
            (
                "checkerboard",
                RgbaImage::from_fn(s, s, |x, y| {
                    let v = if (x / 32 + y / 32) % 2 == 0 { 170 } else { 200 };
                    Rgba([v, v, v, 255])
                }),
            ),
            (
                "stripes",
                RgbaImage::from_fn(s, s, |_, y| {
                    let v = if (y / 24) % 2 == 0 { 140 } else { 170 };
                    Rgba([60, v, 220, 255])
                }),
            ),
            ("violet noise", noise(s, [150, 120, 200], 10, 1)),
            ("green noise", noise(s, [90, 160, 110], 10, 2)),
            ("mosaic", blocks(s, 8, 130, 160, 3)),
            (
                "plasma",
                RgbaImage::from_fn(s, s, |x, y| {
                    let v = (x as f32 * 2.0 * PI / 256.0).sin() + (y as f32 * 2.0 * PI / 256.0).cos();
                    let t = (150.0 + 30.0 * v) as u8;
                    Rgba([t, 200 - t / 2, 100, 255])
                }),
            ),
            ("translucent", RgbaImage::from_pixel(s, s, Rgba([220, 30, 30, 120]))),
            (
                "rings",
                RgbaImage::from_fn(s, s, |x, y| {
                    let (dx, dy) = (x as f32 - f / 2.0, y as f32 - f / 2.0);
                    let t = (128.0 + 50.0 * ((dx * dx + dy * dy).sqrt() / 40.0).sin()) as u8;
                    Rgba([t, t, 255 - t, 255])
                }),
            ),
            (
                "wide gradient",
                RgbaImage::from_fn(s + 288, s / 2, |x, _| Rgba([200, (x * 255 / (s + 288)) as u8, 90, 255])),
            ),
            ("coarse palette", blocks(s, 9, 130, 170, 4)),
            ("hard checkerboard 8px", hard_checkerboard(s, 8)),
            ("hard checkerboard 32px", hard_checkerboard(s, 32)),
            ("hard checkerboard 64px", hard_checkerboard(s, 64)),
            ("full range noise", noise(s, [128, 128, 128], 128, 5)),
            ("photo", photo(s, 6)),
        ]
    }

    #[test]
    fn test_conservative_over_mid_gray_scans() {
        let symbol = SymbolBuilder::new(URL.as_bytes()).build(1024).unwrap();
        assert_eq!(QRReader::read(&symbol.image).unwrap(), URL);

        let art = solid(1024, [128, 128, 128]);
        let out = compose(&symbol.image, &art, BlendStrategy::Conservative, 1024).unwrap();
        assert_eq!(QRReader::read(&out).unwrap(), URL);

        for r in compute_protected_regions(1024) {
            for y in r.y..r.bottom() {
                for x in r.x..r.right() {
                    assert_eq!(out.get_pixel(x, y), symbol.image.get_pixel(x, y));
                }
            }
        }
    }

    #[test_case(BlendStrategy::Conservative)]
    #[test_case(BlendStrategy::ReadableArt)]
    #[test_case(BlendStrategy::Classic)]
    fn test_scannability_sweep(strategy: BlendStrategy) {
        let s = 512;
        let symbol = SymbolBuilder::new(URL.as_bytes()).build(s).unwrap();
        let arts = sweep_arts(s);
        assert_eq!(arts.len(), 25);

        let failed: Vec<&str> = arts
            .iter()
            .filter(|(_, art)| {
                let out = compose(&symbol.image, art, strategy, s).unwrap();
                !QRReader::verify(&out, URL)
            })
            .map(|(name, _)| *name)
            .collect();
        assert!(failed.is_empty(), "{} failed to scan over {failed:?}", strategy.name());
    }

    #[test]
    fn test_readable_art_over_black_keeps_finder_rings() {
        let s = 1024;
        let symbol = SymbolBuilder::new(URL.as_bytes()).build(s).unwrap();
        let out = compose(&symbol.image, &solid(s, [0, 0, 0]), BlendStrategy::ReadableArt, s).unwrap();
        assert_eq!(QRReader::read(&out).unwrap(), URL);

        // The light ring between each finder and the art stays pure white
        let geo = symbol.geometry;
        for (c, r) in geo.finder_origins() {
            let ring = geo.module_rect(c - 1, r - 1, 9, 9, s);
            for (x, y) in [(ring.x, ring.y), (ring.right() - 1, ring.bottom() - 1)] {
                assert_eq!(out.get_pixel(x, y), symbol.image.get_pixel(x, y));
                assert_eq!(out.get_pixel(x, y).0, [255, 255, 255, 255]);
            }
        }

        // Away from the finders light modules drop to the readable floor
        let open = geo.module_rect(30, 30, 1, 1, s);
        assert_eq!(out.get_pixel(open.x, open.y).0[..3], [102, 102, 102]);
    }

    #[test_case(BlendStrategy::Conservative, 32)]
    #[test_case(BlendStrategy::ReadableArt, 8)]
    #[test_case(BlendStrategy::Classic, 64)]
    fn test_hard_checkerboard_at_1024_scans(strategy: BlendStrategy, cell: u32) {
        let s = 1024;
        let symbol = SymbolBuilder::new(URL.as_bytes()).build(s).unwrap();
        let out = compose(&symbol.image, &hard_checkerboard(s, cell), strategy, s).unwrap();
        assert_eq!(QRReader::read(&out).unwrap(), URL);
    }

    #[test]
    fn test_white_art_is_noop_for_readable_art() {
        let symbol = SymbolBuilder::new(URL.as_bytes()).build(512).unwrap();
        let art = solid(512, [255, 255, 255]);
        let out = compose(&symbol.image, &art, BlendStrategy::ReadableArt, 512).unwrap();
        assert_eq!(out, symbol.image);
    }

    #[test]
    fn test_badge_keeps_outside_dark_modules_black() {
        let s = 512;
        let symbol = SymbolBuilder::new(URL.as_bytes()).build(s).unwrap();
        let art = noise(s, [160, 90, 200], 60, 9);
        let comp = Compositor::new(CompositionOptions::new(BlendStrategy::Badge, s)).unwrap();
        let badge = *comp.badge().unwrap();
        let out = comp.compose(&symbol.image, &art).unwrap();

        let mut outside = 0;
        for (x, y, px) in symbol.image.enumerate_pixels() {
            let zone = badge.zone(x, y);
            if zone == BlendZone::InsideBadge {
                continue;
            }
            if brightness(px) < 128.0 {
                assert_eq!(*out.get_pixel(x, y), BLACK);
                outside += 1;
            } else {
                // Light modules never fall below the lift floor
                assert!(out.get_pixel(x, y).0[..3].iter().all(|&c| c >= 180));
            }
        }
        assert!(outside > 0);
    }

    #[test]
    fn test_badge_placement() {
        let comp = Compositor::new(CompositionOptions::new(BlendStrategy::Badge, 1024)).unwrap();
        let badge = comp.badge().unwrap();
        assert!((badge.radius - 179.2).abs() < 1e-3);
        assert!((badge.cx - 783.36).abs() < 1e-2);
        assert!((badge.cy - 783.36).abs() < 1e-2);
        assert_eq!(badge.zone(783, 783), BlendZone::InsideBadge);
        assert_eq!(badge.zone(100, 100), BlendZone::OutsideBadge);

        // The badge never overlaps a protected region
        for r in comp.regions() {
            for (x, y) in [(r.x, r.y), (r.right() - 1, r.y), (r.x, r.bottom() - 1), (r.right() - 1, r.bottom() - 1)] {
                assert_ne!(badge.zone(x, y), BlendZone::InsideBadge);
            }
        }
    }

    #[test]
    fn test_deterministic_across_runs() {
        let symbol = SymbolBuilder::new(URL.as_bytes()).build(400).unwrap();
        let art = noise(333, [120, 140, 160], 80, 42);
        for strategy in BlendStrategy::ALL {
            let a = compose(&symbol.image, &art, strategy, 400).unwrap();
            let b = compose(&symbol.image, &art, strategy, 400).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_json_options_drive_compositor() {
        let opts = CompositionOptions::from_json(
            r#"{ "strategy": "badge", "canvasSize": 512, "badgeRadiusRatio": 0.5, "badgeRingRatio": 0.0 }"#,
        )
        .unwrap();
        let comp = Compositor::new(opts).unwrap();
        assert_eq!(comp.badge().unwrap().radius, 128.0);
        assert_eq!(comp.badge().unwrap().ring_width, 0.0);
    }

    #[test]
    fn test_data_url_round_trip_through_compose() {
        let symbol = SymbolBuilder::new(URL.as_bytes()).build(256).unwrap();
        let art = solid(256, [90, 160, 220]);
        let out = compose(&symbol.image, &art, BlendStrategy::Conservative, 256).unwrap();
        let url = to_data_url(&out).unwrap();
        assert_eq!(from_data_url(&url).unwrap(), out);
    }
}
