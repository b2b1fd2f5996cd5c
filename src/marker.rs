//! JFIF container writer: marker segments with exact byte layouts.
//!
//! Segment order for a finished file: SOI, APP0, DQT x2, SOF0, DHT x4, SOS,
//! entropy-coded scan, EOI. All multi-byte integers are big-endian.

use crate::consts::{marker, JPEG_NATURAL_ORDER};
use crate::huffman::HuffTable;
use crate::quant::QuantTable;

#[inline]
fn write_marker(out: &mut Vec<u8>, code: u8) {
    out.push(0xFF);
    out.push(code);
}

#[inline]
fn write_u16_be(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Start of image
pub fn write_soi(out: &mut Vec<u8>) {
    write_marker(out, marker::SOI);
}

/// End of image
pub fn write_eoi(out: &mut Vec<u8>) {
    write_marker(out, marker::EOI);
}

/// APP0 segment: JFIF 1.01, aspect-ratio density 1:1, no thumbnail.
pub fn write_app0_jfif(out: &mut Vec<u8>) {
    write_marker(out, marker::APP0);
    write_u16_be(out, 16);
    out.extend_from_slice(b"JFIF\0");
    out.extend_from_slice(&[0x01, 0x01]); // version 1.01
    out.push(0x00); // density units: none
    write_u16_be(out, 1); // X density
    write_u16_be(out, 1); // Y density
    out.extend_from_slice(&[0x00, 0x00]); // no thumbnail
}

/// DQT segment for one table, values emitted in zigzag order.
pub fn write_dqt(out: &mut Vec<u8>, table: &QuantTable) {
    write_marker(out, marker::DQT);
    write_u16_be(out, 2 + 1 + 64);
    out.push(table.slot); // 8-bit precision, table id
    for &natural in &JPEG_NATURAL_ORDER {
        out.push(table.values[natural]);
    }
}

/// SOF0 segment: 8-bit baseline, three components, Y sampled 2x2 against
/// 1x1 chroma (4:2:0), chroma sharing quantization table 1.
pub fn write_sof0(out: &mut Vec<u8>, width: u16, height: u16) {
    write_marker(out, marker::SOF0);
    write_u16_be(out, 8 + 3 * 3);
    out.push(8); // sample precision
    write_u16_be(out, height);
    write_u16_be(out, width);
    out.push(3); // component count

    out.push(1); // Y
    out.push(0x22);
    out.push(0);

    out.push(2); // Cb
    out.push(0x11);
    out.push(1);

    out.push(3); // Cr
    out.push(0x11);
    out.push(1);
}

/// DHT segment for one table. `class` is 0 for DC, 1 for AC; `index` is the
/// destination slot.
pub fn write_dht(out: &mut Vec<u8>, table: &HuffTable, class: u8, index: u8) {
    let symbols = table.symbol_count();
    write_marker(out, marker::DHT);
    write_u16_be(out, (2 + 1 + 16 + symbols) as u16);
    out.push((class << 4) | index);
    out.extend_from_slice(&table.bits[1..=16]);
    out.extend_from_slice(&table.values[..symbols]);
}

/// SOS segment: three interleaved components, Y on tables 0, chroma on
/// tables 1, full spectral selection, no successive approximation.
pub fn write_sos(out: &mut Vec<u8>) {
    write_marker(out, marker::SOS);
    write_u16_be(out, 2 * 3 + 2 + 1 + 3);
    out.push(3);

    out.push(1); // Y
    out.push(0x00);
    out.push(2); // Cb
    out.push(0x11);
    out.push(3); // Cr
    out.push(0x11);

    out.push(0x00); // Ss
    out.push(0x3F); // Se
    out.push(0x00); // Ah/Al
}
