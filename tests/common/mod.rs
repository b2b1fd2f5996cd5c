//! Shared helpers for integration tests.
#![allow(dead_code)] // not every test binary uses every helper

/// Create a smooth RGB gradient test image
pub fn gradient_image(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            pixels.push((x * 255 / width.max(1)) as u8);
            pixels.push((y * 255 / height.max(1)) as u8);
            pixels.push(((x + y) * 255 / (width + height)) as u8);
        }
    }
    pixels
}

/// Create a uniform color test image
pub fn uniform_image(width: usize, height: usize, r: u8, g: u8, b: u8) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 3);
    for _ in 0..width * height {
        pixels.push(r);
        pixels.push(g);
        pixels.push(b);
    }
    pixels
}

/// Decode a JPEG and return (pixels, width, height)
pub fn decode(jpeg: &[u8]) -> (Vec<u8>, usize, usize) {
    let mut decoder = jpeg_decoder::Decoder::new(jpeg);
    let pixels = decoder.decode().expect("decode failed");
    let info = decoder.info().expect("missing info");
    assert_eq!(info.pixel_format, jpeg_decoder::PixelFormat::RGB24);
    (pixels, info.width as usize, info.height as usize)
}

/// Peak signal-to-noise ratio between two RGB buffers, in dB
pub fn psnr(a: &[u8], b: &[u8]) -> f64 {
    assert_eq!(a.len(), b.len());
    let mse: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum::<f64>()
        / a.len() as f64;
    if mse == 0.0 {
        f64::INFINITY
    } else {
        10.0 * (255.0f64 * 255.0 / mse).log10()
    }
}

/// Extract the entropy-coded scan: the bytes between the SOS segment and the
/// trailing EOI marker.
pub fn scan_bytes(jpeg: &[u8]) -> &[u8] {
    let mut i = 2; // skip SOI
    loop {
        assert_eq!(jpeg[i], 0xFF, "expected marker at offset {}", i);
        let code = jpeg[i + 1];
        let len = usize::from(u16::from_be_bytes([jpeg[i + 2], jpeg[i + 3]]));
        if code == 0xDA {
            let start = i + 2 + len;
            assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9], "missing EOI");
            return &jpeg[start..jpeg.len() - 2];
        }
        i += 2 + len;
    }
}
