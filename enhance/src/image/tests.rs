use crate::prelude::*;

#[test]
fn new_with_data_checks_length() {
    let desc = ImageDesc::new(3, 2, ColorFormat::RGB_U8);
    assert_eq!(desc.size_in_bytes(), 18);

    assert!(Image::new_with_data(desc, vec![0; 18]).is_ok());

    let result = Image::new_with_data(desc, vec![0; 17]);
    assert!(matches!(result, Err(Error::InvalidShape(_))));
}

#[test]
fn new_empty_is_zeroed() {
    let desc = ImageDesc::new(4, 3, ColorFormat::L_U8);
    let img = Image::new_empty(desc).unwrap();
    assert_eq!(img.bytes().len(), 12);
    assert!(img.bytes().iter().all(|&b| b == 0));
}

#[test]
fn wide_formats_take_more_bytes() {
    let desc = ImageDesc::new(2, 2, ColorFormat::RGB_F32);
    let img = Image::new_empty(desc).unwrap();
    assert_eq!(img.bytes().len(), 2 * 2 * 3 * 4);
    assert_eq!(img.bytes_per_pixel(), 12);
}

#[test]
fn from_raw_maps_channels() {
    let gray = Image::from_raw(2, 3, 1, vec![0; 6]).unwrap();
    assert_eq!(gray.desc().color_format, ColorFormat::L_U8);
    assert_eq!(gray.desc().height, 2);
    assert_eq!(gray.desc().width, 3);

    let rgb = Image::from_raw(2, 3, 3, vec![0; 18]).unwrap();
    assert_eq!(rgb.desc().color_format, ColorFormat::RGB_U8);

    let bad = Image::from_raw(2, 3, 7, vec![0; 42]);
    assert!(matches!(bad, Err(Error::InvalidShape(_))));

    let short = Image::from_raw(2, 3, 3, vec![0; 6]);
    assert!(matches!(short, Err(Error::InvalidShape(_))));
}

#[test]
fn sample_is_row_major() {
    // 2 rows x 3 columns, RGB
    let bytes: Vec<u8> = (0..18).collect();
    let img = Image::from_raw(2, 3, 3, bytes).unwrap();

    assert_eq!(img.sample(0, 0, 0), 0);
    assert_eq!(img.sample(0, 1, 0), 3);
    assert_eq!(img.sample(0, 2, 2), 8);
    assert_eq!(img.sample(1, 0, 0), 9);
    assert_eq!(img.sample(1, 2, 2), 17);
}

#[test]
fn empty_dimensions_are_valid() {
    let desc = ImageDesc::new(0, 5, ColorFormat::L_U8);
    let img = Image::new_empty(desc).unwrap();
    assert!(img.desc().is_empty());
    assert!(img.bytes().is_empty());
}

#[test]
fn take_bytes_returns_buffer() {
    let img = Image::from_raw(1, 2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
    let out = brightness_serial(&img, 1).unwrap();
    assert_eq!(out.take_bytes(), vec![2, 3, 4, 5, 6, 7]);
}
