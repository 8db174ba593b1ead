//! Behavioural tests for the drawing surface

use scribblegen::{Canvas, DrawStyle, DrawSurface, PenColor, Point, StrokeScript, SurfaceMetrics};

fn stroke(canvas: &mut Canvas, points: &[(f32, f32)], style: DrawStyle) {
    let mut it = points.iter().copied().map(Point::from);
    if let Some(first) = it.next() {
        canvas.begin_stroke(first, style);
        for p in it {
            canvas.extend_stroke(p);
        }
    }
    canvas.end_stroke();
}

#[test]
fn strokes_differ_from_cleared_snapshot() {
    let streams: [&[(f32, f32)]; 4] = [
        &[(10.0, 10.0)],
        &[(10.0, 10.0), (90.0, 90.0)],
        &[(5.0, 50.0), (20.0, 40.0), (40.0, 60.0), (80.0, 30.0)],
        &[(50.0, 50.0), (50.0, 50.0), (50.0, 50.0)],
    ];

    for dpr in [1.0, 1.5, 2.0, 3.0] {
        let mut canvas = Canvas::new(SurfaceMetrics::new(100.0, 100.0, dpr)).unwrap();
        let cleared = canvas.export_snapshot().unwrap();

        for points in streams {
            stroke(&mut canvas, points, DrawStyle::default());
            let drawn = canvas.export_snapshot().unwrap();
            assert!(!drawn.png_data.is_empty());
            assert!(!drawn.is_blank(), "stream {:?} at dpr {} drew nothing", points, dpr);
            assert_ne!(drawn.fingerprint, cleared.fingerprint);

            canvas.clear();
            assert_eq!(canvas.export_snapshot().unwrap(), cleared);
        }
    }
}

#[test]
fn clear_is_idempotent() {
    let mut canvas = Canvas::new(SurfaceMetrics::new(64.0, 48.0, 2.0)).unwrap();
    stroke(&mut canvas, &[(4.0, 4.0), (60.0, 44.0)], DrawStyle::default());

    canvas.clear();
    let once = canvas.export_snapshot().unwrap();
    canvas.clear();
    let twice = canvas.export_snapshot().unwrap();
    assert_eq!(once, twice);
    assert_eq!((twice.width, twice.height), (128, 96));
}

#[test]
fn resize_before_drawing_leaves_surface_ready() {
    let mut canvas = Canvas::new(SurfaceMetrics::new(10.0, 10.0, 1.0)).unwrap();
    for m in [
        SurfaceMetrics::new(320.0, 240.0, 2.0),
        SurfaceMetrics::new(320.0, 240.0, 2.0),
        SurfaceMetrics::new(0.0, 0.0, 1.0),
        SurfaceMetrics::new(200.0, 200.0, 1.25),
    ] {
        canvas.resize(m).unwrap();
    }
    assert_eq!(canvas.backing_size(), (250, 250));
    assert!(canvas.is_blank());

    stroke(&mut canvas, &[(20.0, 20.0), (180.0, 20.0)], DrawStyle::default());
    assert!(!canvas.is_blank());
}

#[test]
fn later_style_never_recolors_earlier_stroke() {
    let mut canvas = Canvas::new(SurfaceMetrics::new(60.0, 60.0, 2.0)).unwrap();
    let red = PenColor::rgba(255, 0, 0, 255);
    let blue = PenColor::rgba(0, 0, 255, 255);

    canvas.set_style(DrawStyle::new(red, 6.0));
    canvas.pointer_down(Point::new(5.0, 15.0));
    canvas.extend_stroke(Point::new(55.0, 15.0));
    canvas.end_stroke();

    canvas.set_style(DrawStyle::new(blue, 6.0));
    canvas.pointer_down(Point::new(5.0, 45.0));
    canvas.extend_stroke(Point::new(55.0, 45.0));
    canvas.end_stroke();

    // device coordinates are logical * 2
    assert_eq!(canvas.pixel(60, 30).unwrap(), red);
    assert_eq!(canvas.pixel(60, 90).unwrap(), blue);
}

#[test]
fn pointer_leave_releases_the_stroke() {
    let mut canvas = Canvas::new(SurfaceMetrics::new(50.0, 50.0, 1.0)).unwrap();
    canvas.pointer_down(Point::new(5.0, 5.0));
    canvas.extend_stroke(Point::new(20.0, 5.0));
    canvas.end_stroke(); // leave
    assert!(!canvas.is_drawing());

    let before = canvas.export_snapshot().unwrap();
    canvas.extend_stroke(Point::new(40.0, 40.0));
    assert_eq!(canvas.export_snapshot().unwrap(), before);
}

#[test]
fn snapshot_mid_stroke_holds_committed_segments() {
    let mut canvas = Canvas::new(SurfaceMetrics::new(50.0, 50.0, 1.0)).unwrap();
    canvas.begin_stroke(Point::new(5.0, 25.0), DrawStyle::new(PenColor::BLACK, 4.0));
    canvas.extend_stroke(Point::new(25.0, 25.0));

    let mid = canvas.export_snapshot().unwrap();
    assert!(!mid.is_blank());
    assert!(canvas.is_drawing());

    canvas.extend_stroke(Point::new(45.0, 25.0));
    canvas.end_stroke();
    assert_ne!(canvas.export_snapshot().unwrap().fingerprint, mid.fingerprint);
}

#[test]
fn resize_mid_stroke_continues_on_new_buffer() {
    let mut canvas = Canvas::new(SurfaceMetrics::new(50.0, 50.0, 1.0)).unwrap();
    canvas.begin_stroke(Point::new(5.0, 25.0), DrawStyle::new(PenColor::BLACK, 4.0));
    canvas.extend_stroke(Point::new(20.0, 25.0));
    canvas.resize(SurfaceMetrics::new(50.0, 50.0, 2.0)).unwrap();
    assert!(canvas.is_blank());

    canvas.extend_stroke(Point::new(45.0, 25.0));
    canvas.end_stroke();
    assert_eq!(canvas.pixel(60, 50).unwrap().a, 255);
}

#[test]
fn stroke_script_matches_manual_drawing() {
    let script = StrokeScript::from_json(
        r#"{"surface":{"width":40,"height":40,"dpr":2},
            "strokes":[{"color":"black","width":5,"points":[[4,4],[36,36]]}]}"#,
    )
    .unwrap();
    let replayed = script.replay().unwrap();

    let mut manual = Canvas::new(SurfaceMetrics::new(40.0, 40.0, 2.0)).unwrap();
    stroke(&mut manual, &[(4.0, 4.0), (36.0, 36.0)], DrawStyle::new(PenColor::BLACK, 5.0));

    assert_eq!(
        replayed.export_snapshot().unwrap().fingerprint,
        manual.export_snapshot().unwrap().fingerprint
    );
}

#[test]
fn sharp_turns_get_round_joins_and_caps() {
    let pen = DrawStyle::new(PenColor::BLACK, 12.0);
    for dpr in [1.0f32, 2.0] {
        let mut canvas = Canvas::new(SurfaceMetrics::new(60.0, 50.0, dpr)).unwrap();
        stroke(&mut canvas, &[(10.0, 40.0), (30.0, 10.0), (50.0, 40.0)], pen);

        let alpha = |x: f32, y: f32| {
            let (px, py) = ((x * dpr) as u32, (y * dpr) as u32);
            canvas.pixel(px, py).unwrap().a
        };
        // above the apex, inside the pen radius
        assert_eq!(alpha(30.25, 6.25), 255, "join not round at dpr {}", dpr);
        // past the first point along the segment direction
        assert_eq!(alpha(7.8, 43.3), 255, "start cap not round at dpr {}", dpr);
        // past the last point, mirrored
        assert_eq!(alpha(52.2, 43.3), 255, "end cap not round at dpr {}", dpr);
        // beyond the pen radius above the apex
        assert_eq!(alpha(30.25, 1.0), 0, "join overshoots at dpr {}", dpr);
    }
}
