use glam::Vec3;
use kaleidoscope_tui::visual::color::{
    BlendMode, CONTRAST_PIVOT, GAMMA, Grading, Harmony, aces_filmic, band_weights, blend_palette,
    grade, hsv_to_rgb, luminance, palette_color, palette_info,
};

fn assert_vec_close(a: Vec3, b: Vec3, eps: f32) {
    assert!(
        (a - b).abs().max_element() <= eps,
        "expected {b:?}, got {a:?} (eps {eps})"
    );
}

fn in_unit_cube(c: Vec3) -> bool {
    c.is_finite() && c.min_element() >= 0.0 && c.max_element() <= 1.0
}

/// Display-space gray whose linear-light value is `lin`.
fn gray(lin: f32) -> Vec3 {
    Vec3::splat(lin.powf(1.0 / GAMMA))
}

/// How much `g` brightens a linear gray relative to neutral grading, in display space.
fn gain(lin: f32, g: &Grading) -> f32 {
    grade(gray(lin), g).x / grade(gray(lin), &Grading::neutral()).x
}

// ── harmony anchors ─────────────────────────────────────────────────────────

#[test]
fn spectral_anchors_at_zero() {
    let info = palette_info(0.0, Harmony::Spectral);
    assert_eq!(info.blend, BlendMode::Dual);
    assert_eq!(info.hsv().len(), 2);
    assert!((info.colors[0].x - 0.0).abs() < 1e-6);
    assert!((info.colors[1].x - 0.15).abs() < 1e-6);
}

#[test]
fn hue_shift_of_ninety_degrees_moves_anchors_a_quarter_turn() {
    let g = Grading::neutral();
    let shifted = palette_color(0.0, Harmony::Spectral, 90.0, &g);

    let info = palette_info(0.25, Harmony::Spectral);
    assert!((info.colors[0].x - 0.25).abs() < 1e-6);
    assert!((info.colors[1].x - 0.40).abs() < 1e-6);
    let expected = grade(blend_palette(&info, 0.25), &g);
    assert_vec_close(shifted, expected, 1e-6);
}

#[test]
fn full_turn_hue_shift_is_a_no_op() {
    let g = Grading::neutral();
    for h in Harmony::all() {
        let a = palette_color(0.3, h, 0.0, &g);
        let b = palette_color(0.3, h, 360.0, &g);
        assert_vec_close(a, b, 1e-3);
    }
}

#[test]
fn recipe_arity_matches_blend_mode() {
    assert_eq!(Harmony::Spectral.recipe().blend, BlendMode::Dual);
    assert_eq!(Harmony::Triadic.recipe().blend, BlendMode::Triple);
    assert_eq!(Harmony::Tetradic.recipe().blend, BlendMode::Quad);
    for h in Harmony::all() {
        let r = h.recipe();
        assert_eq!(r.anchors().len(), r.blend.arity(), "{h:?}");
    }
}

#[test]
fn out_of_range_palette_index_falls_back_to_spectral() {
    assert_eq!(Harmony::from_index(13), Harmony::Spectral);
    assert_eq!(Harmony::from_index(-4), Harmony::Spectral);
    assert_eq!(Harmony::from_index(5), Harmony::Tetradic);
    assert_eq!(Harmony::all().len(), 13);
}

#[test]
fn harmony_keys_round_trip_and_cycle() {
    for h in Harmony::all() {
        assert_eq!(Harmony::from_key(h.key()), Some(h));
        assert_eq!(h.next().prev(), h);
    }
    assert_eq!(
        Harmony::from_key("split-complementary"),
        Some(Harmony::SplitComplementary)
    );
    assert_eq!(Harmony::GradientSpectral.next(), Harmony::Spectral);
}

// ── blending ────────────────────────────────────────────────────────────────

#[test]
fn dual_blend_follows_sine_phase() {
    let info = palette_info(0.25, Harmony::Complementary);
    let c0 = hsv_to_rgb(info.colors[0]);
    let c1 = hsv_to_rgb(info.colors[1]);
    // sin(2π·0.25) = 1, so the second anchor wins outright.
    assert_vec_close(blend_palette(&info, 0.25), c1, 1e-5);
    // sin(2π·0.75) = -1, so the first anchor wins.
    assert_vec_close(blend_palette(&info, 0.75), c0, 1e-5);
    // t = 0 sits halfway.
    assert_vec_close(blend_palette(&info, 0.0), c0.lerp(c1, 0.5), 1e-5);
}

#[test]
fn triple_blend_hits_each_anchor_at_bucket_starts() {
    let info = palette_info(0.0, Harmony::Triadic);
    let rgb: Vec<Vec3> = info.hsv().iter().map(|c| hsv_to_rgb(*c)).collect();
    assert_vec_close(blend_palette(&info, 0.0), rgb[0], 1e-5);
    assert_vec_close(blend_palette(&info, 0.5), rgb[1].lerp(rgb[2], 0.5), 1e-4);
}

#[test]
fn quad_blend_wraps_to_first_anchor() {
    let info = palette_info(0.0, Harmony::Tetradic);
    let rgb: Vec<Vec3> = info.hsv().iter().map(|c| hsv_to_rgb(*c)).collect();
    // Last bucket interpolates from the fourth anchor back to the first.
    assert_vec_close(blend_palette(&info, 0.875), rgb[3].lerp(rgb[0], 0.5), 1e-4);
}

// ── conversions and curves ──────────────────────────────────────────────────

#[test]
fn hsv_primaries() {
    assert_vec_close(hsv_to_rgb(Vec3::new(0.0, 1.0, 1.0)), Vec3::new(1.0, 0.0, 0.0), 1e-6);
    assert_vec_close(
        hsv_to_rgb(Vec3::new(1.0 / 3.0, 1.0, 1.0)),
        Vec3::new(0.0, 1.0, 0.0),
        1e-5,
    );
    assert_vec_close(
        hsv_to_rgb(Vec3::new(2.0 / 3.0, 1.0, 1.0)),
        Vec3::new(0.0, 0.0, 1.0),
        1e-5,
    );
    assert_vec_close(hsv_to_rgb(Vec3::new(0.4, 0.0, 0.5)), Vec3::splat(0.5), 1e-6);
}

#[test]
fn aces_maps_black_to_black_and_compresses_white() {
    assert_eq!(aces_filmic(Vec3::ZERO), Vec3::ZERO);
    let w = aces_filmic(Vec3::ONE);
    assert!((w.x - 2.54 / 3.16).abs() < 1e-5);
    assert_eq!(aces_filmic(Vec3::splat(1000.0)), Vec3::ONE);
}

#[test]
fn band_weights_at_extremes() {
    let (s, m, h) = band_weights(0.0);
    assert_eq!((s, m, h), (1.0, 0.0, 0.0));
    let (s, m, h) = band_weights(0.5);
    assert_eq!((s, m, h), (1.0, 1.0, 0.0));
    let (s, m, h) = band_weights(1.0);
    assert_eq!((s, m, h), (0.0, 0.0, 1.0));
}

// ── grading ─────────────────────────────────────────────────────────────────

#[test]
fn neutral_grading_reduces_to_tone_curve() {
    let g = Grading::neutral();
    for c in [
        Vec3::new(0.9, 0.2, 0.1),
        Vec3::new(0.1, 0.5, 0.8),
        Vec3::splat(0.3),
    ] {
        let expected = aces_filmic(c.powf(2.2)).powf(1.0 / 2.2);
        assert_vec_close(grade(c, &g), expected, 1e-4);
    }
}

#[test]
fn neutral_grading_is_not_an_identity() {
    // ACES still compresses highlights with every control at rest.
    let white = grade(Vec3::ONE, &Grading::neutral());
    assert!(white.x < 0.95, "expected tone-mapped white, got {white:?}");
}

#[test]
fn zero_saturation_yields_gray() {
    let g = Grading {
        saturation: 0.0,
        ..Grading::neutral()
    };
    let c = grade(Vec3::new(0.9, 0.1, 0.4), &g);
    assert_eq!(c.x, c.y);
    assert_eq!(c.y, c.z);
}

#[test]
fn exposure_brightens() {
    let base = grade(Vec3::splat(0.4), &Grading::neutral());
    let bright = grade(
        Vec3::splat(0.4),
        &Grading {
            exposure: 1.5,
            ..Grading::neutral()
        },
    );
    assert!(luminance(bright) > luminance(base));
}

#[test]
fn warm_balance_tilts_red_over_blue() {
    let g = Grading {
        color_balance: 1.0,
        ..Grading::neutral()
    };
    let c = grade(Vec3::splat(0.5), &g);
    assert!(c.x > c.z, "expected warm tilt, got {c:?}");
    let cool = grade(
        Vec3::splat(0.5),
        &Grading {
            color_balance: -1.0,
            ..Grading::neutral()
        },
    );
    assert!(cool.z > cool.x, "expected cool tilt, got {cool:?}");
}

#[test]
fn contrast_pivots_on_middle_gray() {
    let expected = aces_filmic(Vec3::splat(CONTRAST_PIVOT)).powf(1.0 / GAMMA);
    for contrast in [0.25, 0.5, 1.0, 2.0, 3.0] {
        let g = Grading {
            contrast,
            ..Grading::neutral()
        };
        assert_vec_close(grade(gray(CONTRAST_PIVOT), &g), expected, 1e-4);
    }

    let punchy = Grading {
        contrast: 2.0,
        ..Grading::neutral()
    };
    assert!(gain(0.5, &punchy) > 1.0);
    assert!(gain(0.05, &punchy) < 1.0);
}

#[test]
fn bands_scale_linear_light_before_tone_curve() {
    let g = Grading {
        shadows: 0.4,
        midtones: 0.3,
        highlights: 0.2,
        ..Grading::neutral()
    };
    for lin in [0.05, 0.3, 0.5, 0.8] {
        let (ws, wm, wh) = band_weights(lin);
        let scale = (1.0 + 0.4 * ws) * (1.0 + 0.3 * wm) * (1.0 + 0.2 * wh);
        let expected = aces_filmic(Vec3::splat(lin * scale)).powf(1.0 / GAMMA);
        assert_vec_close(grade(gray(lin), &g), expected, 1e-4);
    }
}

#[test]
fn shadows_lift_dark_tones_more_than_bright() {
    let lift = Grading {
        shadows: 0.5,
        ..Grading::neutral()
    };
    let dark = gain(0.05, &lift);
    let bright = gain(0.9, &lift);
    assert!(dark > 1.2, "dark gain {dark}");
    assert!(dark > bright, "dark {dark} vs bright {bright}");

    let crush = Grading {
        shadows: -0.5,
        ..Grading::neutral()
    };
    assert!(gain(0.05, &crush) < 1.0);
}

#[test]
fn highlights_lift_bright_tones_and_leave_dark_ones() {
    let g = Grading {
        highlights: 0.5,
        ..Grading::neutral()
    };
    assert!((gain(0.05, &g) - 1.0).abs() < 1e-4);
    let bright = gain(0.9, &g);
    assert!(bright > 1.05, "bright gain {bright}");

    let dim = Grading {
        highlights: -0.5,
        ..Grading::neutral()
    };
    assert!(gain(0.9, &dim) < 1.0);
}

#[test]
fn midtones_peak_at_half_luminance() {
    assert_eq!(band_weights(0.5).1, 1.0);
    assert_eq!(band_weights(0.25).1, 0.5);
    assert_eq!(band_weights(0.75).1, 0.5);
    assert_eq!(band_weights(0.0).1, 0.0);

    let g = Grading {
        midtones: 0.5,
        ..Grading::neutral()
    };
    let mid = gain(0.5, &g);
    assert!(mid > gain(0.05, &g), "mid {mid}");
    assert!(mid > gain(0.95, &g), "mid {mid}");
}

#[test]
fn extreme_grading_stays_in_range() {
    let g = Grading {
        exposure: 4.0,
        contrast: 3.0,
        shadows: 1.0,
        midtones: -1.0,
        highlights: 1.0,
        color_balance: 1.0,
        saturation: 200.0,
    };
    for h in Harmony::all() {
        for i in 0..16 {
            let t = i as f32 / 16.0 - 3.0;
            assert!(in_unit_cube(palette_color(t, h, 45.0, &g)), "{h:?} t={t}");
        }
    }
}
