use mouselock::config::{BACKGROUND_COLOR, CENTRAL_SPOT_RADIUS, FOREGROUND_COLOR};
use mouselock::{Color, ImageDesc, Painter, PixelBuffer, PixelFormat, Point, Size};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const R: i32 = CENTRAL_SPOT_RADIUS;
const SENTINEL: u32 = 0x1234_5678;

fn blank(width: i32, height: i32) -> PixelBuffer {
    PixelBuffer::new(Size::new(width, height)).unwrap()
}

fn padded(width: i32, height: i32, padding: i32) -> PixelBuffer {
    let desc = ImageDesc {
        size: Size::new(width, height),
        stride: (width + padding) * 4,
        format: PixelFormat::BgraPremul,
    };
    PixelBuffer::from_raw(desc, vec![SENTINEL; ((width + padding) * height) as usize])
}

fn assert_padding_untouched(image: &PixelBuffer, padding: i32) {
    let size = image.size();
    let row = (size.width + padding) as usize;
    for (i, &p) in image.pixels().iter().enumerate() {
        if i % row >= size.width as usize {
            assert_eq!(p, SENTINEL, "padding cell {i} of a {size:?} image was written");
        }
    }
}

fn needle_only(width: i32, height: i32, movement: Point) -> PixelBuffer {
    let mut painter = Painter::default();
    let mut image = blank(width, height);
    painter.clear_to_background(&mut image);
    painter.draw_needle(&mut image, FOREGROUND_COLOR, movement);
    image
}

#[test]
fn paint_image_clears_then_draws_spot() {
    let mut painter = Painter::default();
    let image = painter.paint_image(Size::new(64, 48), Point::ZERO).unwrap();

    let center = Point::new(32, 24);
    assert_eq!(image.pixel(center.x, center.y), Some(FOREGROUND_COLOR));
    assert_eq!(image.pixel(center.x + R, center.y), Some(BACKGROUND_COLOR));
    assert_eq!(image.pixel(0, 0), Some(BACKGROUND_COLOR));
    assert_eq!(image.pixel(63, 47), Some(BACKGROUND_COLOR));
}

#[test]
fn clear_covers_every_size() {
    let mut painter = Painter::default();
    for (w, h) in [(1, 1), (7, 3), (100, 1), (1, 100), (33, 33)] {
        let mut image = blank(w, h);
        painter.clear_to_background(&mut image);
        assert!(
            image.pixels().iter().all(|&p| p == BACKGROUND_COLOR.value()),
            "{w}x{h}"
        );
    }
}

#[test]
fn horizontal_needle_reaches_its_tip() {
    let image = needle_only(100, 100, Point::new(20, 0));
    assert_eq!(image.pixel(68, 50), Some(FOREGROUND_COLOR));
    assert_eq!(image.pixel(10, 50), Some(BACKGROUND_COLOR));
    // Beyond the tip.
    assert_eq!(image.pixel(71, 50), Some(BACKGROUND_COLOR));
}

#[test]
fn opposite_horizontal_needles_mirror_each_other() {
    let right = needle_only(100, 100, Point::new(20, 0));
    let left = needle_only(100, 100, Point::new(-20, 0));

    assert_eq!(left.pixel(32, 50), Some(FOREGROUND_COLOR));
    for y in 0..100 {
        for x in 1..100 {
            assert_eq!(right.pixel(x, y), left.pixel(100 - x, y), "({x}, {y})");
        }
    }
}

#[test]
fn opposite_vertical_needles_mirror_each_other() {
    let down = needle_only(100, 100, Point::new(0, 20));
    let up = needle_only(100, 100, Point::new(0, -20));

    assert_eq!(down.pixel(50, 68), Some(FOREGROUND_COLOR));
    for y in 1..100 {
        for x in 0..100 {
            assert_eq!(down.pixel(x, y), up.pixel(x, 100 - y), "({x}, {y})");
        }
    }
}

#[test]
fn needle_wins_where_it_overlaps_the_spot() {
    let mut painter = Painter::default();
    let spot = Color::new(0xff, 0, 0);
    let needle = Color::new(0, 0xff, 0);
    let mut image = blank(100, 100);
    painter.clear_to_background(&mut image);
    painter.draw_center_spot(&mut image, spot);
    painter.draw_needle(&mut image, needle, Point::new(20, 0));

    assert_eq!(image.pixel(52, 50), Some(needle));
    assert_eq!(image.pixel(48, 50), Some(spot));
    assert_eq!(image.pixel(50, 50), Some(spot));
}

#[test]
fn tiny_view_is_clipped_to_its_edges() {
    let mut painter = Painter::default();
    let mut image = padded(10, 10, 2);
    painter.clear_to_background(&mut image);
    painter.draw_center_spot(&mut image, FOREGROUND_COLOR);
    painter.draw_needle(&mut image, FOREGROUND_COLOR, Point::new(-40, 25));
    painter.draw_needle(&mut image, FOREGROUND_COLOR, Point::new(40, -25));

    assert_padding_untouched(&image, 2);
    assert_eq!(image.pixel(5, 5), Some(FOREGROUND_COLOR));
    assert_eq!(image.pixel(5, 0), Some(BACKGROUND_COLOR));
}

#[test]
fn random_vectors_never_write_outside_rows() {
    let mut rng = StdRng::seed_from_u64(0x6d6f_7573);
    let mut painter = Painter::default();

    for _ in 0..200 {
        let (w, h) = (rng.random_range(1..40), rng.random_range(1..40));
        let padding = rng.random_range(0..4);
        let movement = Point::new(rng.random_range(-60..=60), rng.random_range(-60..=60));

        let mut image = padded(w, h, padding);
        painter.clear_to_background(&mut image);
        painter.draw_center_spot(&mut image, FOREGROUND_COLOR);
        painter.draw_needle(&mut image, FOREGROUND_COLOR, movement);

        assert_padding_untouched(&image, padding);
        for y in 0..h {
            for x in 0..w {
                let pixel = image.pixel(x, y);
                assert!(
                    pixel == Some(BACKGROUND_COLOR) || pixel == Some(FOREGROUND_COLOR),
                    "{w}x{h} {movement:?} left ({x}, {y}) unpainted"
                );
            }
        }
    }
}

#[test]
fn random_vectors_mirror_across_the_vertical_center() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut painter = Painter::default();
    let size = Size::new(120, 120);

    for _ in 0..50 {
        let movement = Point::new(rng.random_range(-100..=100), rng.random_range(-100..=100));
        let mirrored = Point::new(-movement.x, movement.y);
        let a = painter.paint_image(size, movement).unwrap();
        let b = painter.paint_image(size, mirrored).unwrap();

        for y in 0..120 {
            for x in 1..120 {
                assert_eq!(a.pixel(x, y), b.pixel(120 - x, y), "{movement:?} at ({x}, {y})");
            }
        }
    }
}

#[test]
fn movements_inside_the_spot_leave_the_image_alone() {
    let mut painter = Painter::default();
    let reference = painter.paint_image(Size::new(50, 50), Point::ZERO).unwrap();

    for x in -R..=R {
        for y in -R..=R {
            if x * x + y * y > R * R {
                continue;
            }
            let image = painter.paint_image(Size::new(50, 50), Point::new(x, y)).unwrap();
            assert_eq!(image, reference, "({x}, {y})");
        }
    }
}
