use crate::models::Coordinates;

/// Encode a path with the encoded polyline algorithm (lat before lng)
pub fn encode(path: &[Coordinates], precision: u32) -> String {
    let factor = 10_f64.powi(precision as i32);
    let mut encoded = String::with_capacity(path.len() * 8);
    let mut prev_lat = 0_i64;
    let mut prev_lng = 0_i64;

    for point in path {
        let lat = (point.lat * factor).round() as i64;
        let lng = (point.lng * factor).round() as i64;
        encode_value(lat - prev_lat, &mut encoded);
        encode_value(lng - prev_lng, &mut encoded);
        prev_lat = lat;
        prev_lng = lng;
    }

    encoded
}

fn encode_value(delta: i64, out: &mut String) {
    let mut value = delta << 1;
    if delta < 0 {
        value = !value;
    }
    while value >= 0x20 {
        out.push(char::from((((value & 0x1f) | 0x20) + 63) as u8));
        value >>= 5;
    }
    out.push(char::from((value + 63) as u8));
}
