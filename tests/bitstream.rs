//! Container-level tests: marker layout, byte stuffing, scan contents.

mod common;

use basejpeg::{Backend, Encoder};
use common::{gradient_image, scan_bytes, uniform_image};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Walk the marker segments preceding the scan and return the marker codes
/// in order.
fn leading_markers(jpeg: &[u8]) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    let mut markers = vec![0xD8];
    let mut i = 2;
    loop {
        assert_eq!(jpeg[i], 0xFF);
        let code = jpeg[i + 1];
        markers.push(code);
        if code == 0xDA {
            return markers;
        }
        let len = usize::from(u16::from_be_bytes([jpeg[i + 2], jpeg[i + 3]]));
        i += 2 + len;
    }
}

#[test]
fn segment_order() {
    let pixels = gradient_image(24, 24);
    let jpeg = Encoder::new(Backend::Cpu, 75)
        .unwrap()
        .encode_to_vec(&pixels, 24, 24)
        .unwrap();

    assert_eq!(
        leading_markers(&jpeg),
        // SOI, APP0, DQT x2, SOF0, DHT x4, SOS
        vec![0xD8, 0xE0, 0xDB, 0xDB, 0xC0, 0xC4, 0xC4, 0xC4, 0xC4, 0xDA]
    );
    assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
}

#[test]
fn dht_segments_cover_all_four_tables() {
    let pixels = gradient_image(16, 16);
    let jpeg = Encoder::new(Backend::Cpu, 75)
        .unwrap()
        .encode_to_vec(&pixels, 16, 16)
        .unwrap();

    // Collect the Tc/Th byte of each DHT segment
    let mut classes = Vec::new();
    let mut i = 2;
    while jpeg[i + 1] != 0xDA {
        let code = jpeg[i + 1];
        let len = usize::from(u16::from_be_bytes([jpeg[i + 2], jpeg[i + 3]]));
        if code == 0xC4 {
            classes.push(jpeg[i + 4]);
        }
        i += 2 + len;
    }
    // DC-0, AC-0, DC-1, AC-1
    assert_eq!(classes, vec![0x00, 0x10, 0x01, 0x11]);
}

#[test]
fn sof0_records_dimensions() {
    let pixels = gradient_image(300, 200);
    let jpeg = Encoder::new(Backend::Cpu, 75)
        .unwrap()
        .encode_to_vec(&pixels, 300, 200)
        .unwrap();

    // Find SOF0 and check height/width fields
    let mut i = 2;
    loop {
        if jpeg[i + 1] == 0xC0 {
            let height = u16::from_be_bytes([jpeg[i + 5], jpeg[i + 6]]);
            let width = u16::from_be_bytes([jpeg[i + 7], jpeg[i + 8]]);
            assert_eq!((width, height), (300, 200));
            break;
        }
        let len = usize::from(u16::from_be_bytes([jpeg[i + 2], jpeg[i + 3]]));
        i += 2 + len;
    }
}

#[test]
fn scan_has_no_unstuffed_ff() {
    let mut rng = StdRng::seed_from_u64(99);
    for quality in [1, 25, 50, 90, 100] {
        let (width, height) = (80, 56);
        let pixels: Vec<u8> = (0..width * height * 3).map(|_| rng.gen()).collect();
        let jpeg = Encoder::new(Backend::Cpu, quality)
            .unwrap()
            .encode_to_vec(&pixels, width, height)
            .unwrap();

        let scan = scan_bytes(&jpeg);
        let mut i = 0;
        while i < scan.len() {
            if scan[i] == 0xFF {
                assert!(
                    i + 1 < scan.len() && scan[i + 1] == 0x00,
                    "q{}: unstuffed 0xFF at scan offset {}",
                    quality,
                    i
                );
                i += 2;
            } else {
                i += 1;
            }
        }
    }
}

#[test]
fn mid_gray_scan_is_all_eob() {
    // A 16x16 solid mid-gray image quantizes to all-zero blocks: four luma
    // blocks each emit DC category 0 (00) + EOB (1010), both chroma blocks
    // emit DC category 0 (00) + EOB (00). Exactly 32 bits, no padding.
    let pixels = uniform_image(16, 16, 128, 128, 128);
    let jpeg = Encoder::new(Backend::Cpu, 50)
        .unwrap()
        .encode_to_vec(&pixels, 16, 16)
        .unwrap();

    assert_eq!(scan_bytes(&jpeg), &[0x28, 0xA2, 0x8A, 0x00]);
}

#[test]
fn single_mcu_file_is_small() {
    let jpeg = Encoder::new(Backend::Cpu, 75)
        .unwrap()
        .encode_to_vec(&[255, 0, 0], 1, 1)
        .unwrap();
    assert!(jpeg.len() < 700, "1x1 file is {} bytes", jpeg.len());

    let (decoded, w, h) = common::decode(&jpeg);
    assert_eq!((w, h), (1, 1));
    assert_eq!(decoded.len(), 3);
}

#[test]
fn scan_length_is_byte_aligned_total() {
    // The flush pads the final byte with 1-bits; the scan length must be
    // exactly ceil(total_bits / 8) which we can bound from below by the
    // segment being non-empty for any real image.
    let pixels = gradient_image(40, 40);
    let jpeg = Encoder::new(Backend::Cpu, 75)
        .unwrap()
        .encode_to_vec(&pixels, 40, 40)
        .unwrap();
    let scan = scan_bytes(&jpeg);
    assert!(!scan.is_empty());
    // 40x40 = 9 MCUs, at least 6 symbols each
    assert!(scan.len() >= 9);
}
