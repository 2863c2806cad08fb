use std::io::Cursor;

use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

/// Solid-colour PNG of the given size.
pub fn create_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 255]));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .expect("Failed to encode PNG fixture");
    buffer
}

/// What the fake rasterizer returns for page 1 (a 150 DPI US-letter page is
/// 1275x1650; scaled down to keep tests fast).
pub fn page_render_png() -> Vec<u8> {
    create_png(85, 110)
}

/// A minimal two-page PDF with an info dictionary.
pub fn create_two_page_pdf() -> Vec<u8> {
    b"%PDF-1.4\n\
1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n\
2 0 obj << /Type /Pages /Kids [3 0 R 4 0 R] /Count 2 >> endobj\n\
3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >> endobj\n\
4 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >> endobj\n\
5 0 obj << /Title (Annual Report) /Author (Folio Tests) >> endobj\n\
trailer << /Root 1 0 R /Info 5 0 R >>\n\
%%EOF\n"
        .to_vec()
}

/// PDF signature followed by garbage.
pub fn create_corrupt_pdf() -> Vec<u8> {
    b"%PDF-1.7\n\x00\x13garbage without objects".to_vec()
}

/// What the fake rasterizer accepts as renderable.
pub fn is_well_formed_pdf(data: &[u8]) -> bool {
    let text = String::from_utf8_lossy(data);
    text.starts_with("%PDF") && text.contains("/Type /Catalog") && text.contains("%%EOF")
}

fn rational(num: u32, denom: u32) -> Rational {
    Rational { num, denom }
}

fn ascii(tag: Tag, text: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![text.as_bytes().to_vec()]),
    }
}

/// TIFF-encoded EXIF block: camera, capture time, orientation and a GPS fix
/// at 48° 51' 29.52" N, 2° 17' 40.20" E, 35 m.
pub fn create_exif_block(orientation: u16) -> Vec<u8> {
    let fields = vec![
        ascii(Tag::Make, "FUJIFILM"),
        ascii(Tag::Model, "X-T4"),
        ascii(Tag::DateTimeOriginal, "2022:08:01 09:15:30"),
        Field {
            tag: Tag::Orientation,
            ifd_num: In::PRIMARY,
            value: Value::Short(vec![orientation]),
        },
        ascii(Tag::GPSLatitudeRef, "N"),
        Field {
            tag: Tag::GPSLatitude,
            ifd_num: In::PRIMARY,
            value: Value::Rational(vec![rational(48, 1), rational(51, 1), rational(2952, 100)]),
        },
        ascii(Tag::GPSLongitudeRef, "E"),
        Field {
            tag: Tag::GPSLongitude,
            ifd_num: In::PRIMARY,
            value: Value::Rational(vec![rational(2, 1), rational(17, 1), rational(4020, 100)]),
        },
        Field {
            tag: Tag::GPSAltitude,
            ifd_num: In::PRIMARY,
            value: Value::Rational(vec![rational(35, 1)]),
        },
    ];

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut buf = Cursor::new(Vec::new());
    writer
        .write(&mut buf, false)
        .expect("Failed to write EXIF fixture");
    buf.into_inner()
}

/// JPEG of the given size carrying [`create_exif_block`] in an APP1 segment.
pub fn create_jpeg_with_exif(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([30, 120, 200]));
    let mut jpeg = Vec::new();
    img.write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
        .expect("Failed to encode JPEG fixture");

    let tiff = create_exif_block(orientation);
    let segment_len = u16::try_from(2 + 6 + tiff.len()).expect("EXIF fixture fits one segment");

    // SOI, then APP1 "Exif\0\0" + TIFF, then the rest of the encoded image
    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}
