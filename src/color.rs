/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Colour conversions between the schema's RGB triples and the colour
//! spaces vendors speak: HSV (Wink, SmartThings, Hue hue/sat) and CIE xy
//! (Hue), plus colour temperature in mireds.

/// Returns hue in degrees `[0, 360)`, saturation and value in `[0, 1]`.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> (f64, f64, f64) {
    let r = f64::from(rgb[0]) / 255.0;
    let g = f64::from(rgb[1]) / 255.0;
    let b = f64::from(rgb[2]) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let hue = if hue < 0.0 { hue + 360.0 } else { hue };
    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    (hue, saturation, max)
}

pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> [u8; 3] {
    let hue = hue.rem_euclid(360.0);
    let saturation = saturation.clamp(0.0, 1.0);
    let value = value.clamp(0.0, 1.0);

    let c = value * saturation;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = value - c;

    let (r, g, b) = match (hue / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [to_byte(r + m), to_byte(g + m), to_byte(b + m)]
}

/// CIE 1931 chromaticity for an sRGB colour, using the Wide RGB D65
/// matrix Hue bridges expect. Black has no chromaticity and maps to (0, 0).
pub fn rgb_to_xy(rgb: [u8; 3]) -> (f64, f64) {
    let r = expand_gamma(f64::from(rgb[0]) / 255.0);
    let g = expand_gamma(f64::from(rgb[1]) / 255.0);
    let b = expand_gamma(f64::from(rgb[2]) / 255.0);

    let x = r * 0.664511 + g * 0.154324 + b * 0.162028;
    let y = r * 0.283881 + g * 0.668433 + b * 0.047685;
    let z = r * 0.000088 + g * 0.072310 + b * 0.986039;

    let sum = x + y + z;
    if sum == 0.0 {
        return (0.0, 0.0);
    }
    (x / sum, y / sum)
}

/// Inverse of `rgb_to_xy` at the given brightness in `[0, 1]`.
pub fn xy_to_rgb(x: f64, y: f64, brightness: f64) -> [u8; 3] {
    if y <= 0.0 {
        return [0, 0, 0];
    }
    let big_y = brightness.clamp(0.0, 1.0);
    let big_x = (big_y / y) * x;
    let big_z = (big_y / y) * (1.0 - x - y);

    let rgb = [
        big_x * 1.656492 - big_y * 0.354851 - big_z * 0.255038,
        -big_x * 0.707196 + big_y * 1.655397 + big_z * 0.036152,
        big_x * 0.051713 - big_y * 0.121364 + big_z * 1.011530,
    ];
    let rgb = normalize(rgb);
    let rgb = normalize([
        compress_gamma(rgb[0]),
        compress_gamma(rgb[1]),
        compress_gamma(rgb[2]),
    ]);
    [to_byte(rgb[0]), to_byte(rgb[1]), to_byte(rgb[2])]
}

pub fn kelvin_to_mired(kelvin: u32) -> u32 {
    reciprocal_million(kelvin)
}

pub fn mired_to_kelvin(mired: u32) -> u32 {
    reciprocal_million(mired)
}

fn reciprocal_million(value: u32) -> u32 {
    if value == 0 {
        return 0;
    }
    (1_000_000.0 / f64::from(value)).round() as u32
}

fn expand_gamma(c: f64) -> f64 {
    if c > 0.04045 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

fn compress_gamma(c: f64) -> f64 {
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn normalize(rgb: [f64; 3]) -> [f64; 3] {
    let max = rgb[0].max(rgb[1]).max(rgb[2]);
    if max > 1.0 {
        [rgb[0] / max, rgb[1] / max, rgb[2] / max]
    } else {
        rgb
    }
}

fn to_byte(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}
