use chrono::TimeZone;

use super::*;
use crate::foundation::core::CanvasSize;

fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).unwrap()
}

#[test]
fn raster_uses_background_for_unset_pixels() {
    let mut c = Canvas::new(CanvasSize::new(4, 3).unwrap(), 8, "gestural");
    c.draw_pixel(1, 2, Rgb8::new(255, 0, 10));
    let img = c.to_rgb_image(Rgb8::new(9, 9, 9));
    assert_eq!(img.dimensions(), (4, 3));
    assert_eq!(img.get_pixel(1, 2).0, [255, 0, 10]);
    assert_eq!(img.get_pixel(0, 0).0, [9, 9, 9]);
}

#[test]
fn png_decodes_back_to_the_raster() {
    let mut c = Canvas::new(CanvasSize::new(8, 8).unwrap(), 8, "gestural");
    c.draw_pixel(7, 7, Rgb8::new(1, 2, 3));
    let png = c.encode_png(Rgb8::black()).expect("encode");
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

    let decoded = image::load_from_memory(&png).expect("decode").to_rgb8();
    assert_eq!(decoded.get_pixel(7, 7).0, [1, 2, 3]);
    assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0]);
}

#[test]
fn names_are_timestamped_and_suffixed_on_collision() {
    let dir = tempfile::tempdir().expect("tempdir");
    let c = Canvas::new(CanvasSize::new(2, 2).unwrap(), 8, "gestural");

    let first = c.export_png(dir.path(), Rgb8::black(), at()).expect("first");
    let second = c.export_png(dir.path(), Rgb8::black(), at()).expect("second");

    assert_eq!(first.file_name().unwrap(), "drawing_20260314_150926.png");
    assert_eq!(second.file_name().unwrap(), "drawing_20260314_150926_1.png");
    assert!(first.exists() && second.exists());
}

#[test]
fn export_creates_the_drawings_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("drawings");
    let c = Canvas::new(CanvasSize::new(2, 2).unwrap(), 8, "gestural");
    let path = c.export_png(&nested, Rgb8::black(), at()).expect("export");
    assert!(path.starts_with(&nested));
}
