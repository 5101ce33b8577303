/*!
picture: the vector picture-command decoder (spec §4.6).

A picture resource is a stream of draw commands `0xF0..=0xFF` interleaved
with point payloads; a payload run continues until the next byte is `>=
0xF0`. This mirrors the dispatch shape of `lib/picture.cpp` in the original
(collect points until the next command byte, then hand the whole run to the
matching drawing primitive) translated into owned Rust data rather than a
`std::vector<uint8_t>&` out-parameter.
*/

use crate::render::framebuffer::Framebuffer;
use crate::resource::reader::ByteReader;

const CMD_SET_PICTURE_COLOR: u8 = 0xF0;
const CMD_DISABLE_PICTURE: u8 = 0xF1;
const CMD_SET_PRIORITY_COLOR: u8 = 0xF2;
const CMD_DISABLE_PRIORITY: u8 = 0xF3;
const CMD_Y_CORNER: u8 = 0xF4;
const CMD_X_CORNER: u8 = 0xF5;
const CMD_ABS_LINE: u8 = 0xF6;
const CMD_REL_LINE: u8 = 0xF7;
const CMD_FILL: u8 = 0xF8;
const CMD_END: u8 = 0xFF;

/// Draw a straight line from `(x0, y0)` to `(x1, y1)` using the
/// integer-stepping algorithm of spec §4.6: step by one along the axis of
/// greater absolute delta, accumulate the other axis fractionally.
fn draw_line(fb: &mut Framebuffer, x0: i32, y0: i32, x1: i32, y1: i32) {
    fb.plot(x0, y0);
    let dx = x1 - x0;
    let dy = y1 - y0;
    if dx == 0 && dy == 0 {
        return;
    }
    let steps = dx.abs().max(dy.abs());
    if dx.abs() >= dy.abs() {
        let xstep = dx.signum();
        let yrate = dy as f64 / steps as f64;
        let mut y_acc = y0 as f64;
        let mut x = x0;
        for _ in 0..steps {
            x += xstep;
            y_acc += yrate;
            fb.plot(x, y_acc.round() as i32);
        }
    } else {
        let ystep = dy.signum();
        let xrate = dx as f64 / steps as f64;
        let mut x_acc = x0 as f64;
        let mut y = y0;
        for _ in 0..steps {
            y += ystep;
            x_acc += xrate;
            fb.plot(x_acc.round() as i32, y);
        }
    }
}

fn draw_corner(fb: &mut Framebuffer, points: &[u8], vertical_first: bool) {
    if points.len() < 2 {
        return;
    }
    let mut x = points[0] as i32;
    let mut y = points[1] as i32;
    fb.plot(x, y);

    let mut vertical_turn = vertical_first;
    let mut i = 2;
    while i < points.len() {
        let v = points[i] as i32;
        i += 1;
        if vertical_turn {
            draw_line(fb, x, y, x, v);
            y = v;
        } else {
            draw_line(fb, x, y, v, y);
            x = v;
        }
        vertical_turn = !vertical_turn;
    }
}

fn draw_absolute_polyline(fb: &mut Framebuffer, points: &[u8]) {
    if points.len() < 2 {
        return;
    }
    let mut x = points[0] as i32;
    let mut y = points[1] as i32;
    fb.plot(x, y);
    let mut i = 2;
    while i + 1 < points.len() {
        let nx = points[i] as i32;
        let ny = points[i + 1] as i32;
        draw_line(fb, x, y, nx, ny);
        x = nx;
        y = ny;
        i += 2;
    }
}

fn signed_nibble(n: u8) -> i32 {
    let magnitude = (n & 0x07) as i32;
    if n & 0x08 != 0 {
        -magnitude
    } else {
        magnitude
    }
}

fn draw_relative_polyline(fb: &mut Framebuffer, points: &[u8]) {
    if points.len() < 2 {
        return;
    }
    let mut x = points[0] as i32;
    let mut y = points[1] as i32;
    fb.plot(x, y);
    for &b in &points[2..] {
        let dx = signed_nibble(b >> 4);
        let dy = signed_nibble(b & 0x0f);
        let nx = x + dx;
        let ny = y + dy;
        draw_line(fb, x, y, nx, ny);
        x = nx;
        y = ny;
    }
}

fn fill(fb: &mut Framebuffer, points: &[u8]) {
    for pair in points.chunks_exact(2) {
        fb.fill(pair[0], pair[1]);
    }
}

/// Decode a picture command stream into `fb`. Does not clear `fb` first —
/// callers decide between `draw.pic` (clear then decode) and `overlay.pic`
/// (decode without clearing).
pub fn decode(payload: &[u8], fb: &mut Framebuffer) {
    let mut r = ByteReader::new(payload);
    let mut points = Vec::new();
    while !r.at_end() {
        let cmd = match r.u8() {
            Ok(c) => c,
            Err(_) => break,
        };
        match cmd {
            CMD_SET_PICTURE_COLOR => {
                if let Ok(c) = r.u8() {
                    fb.set_picture_color(c);
                }
            }
            CMD_DISABLE_PICTURE => fb.disable_picture(),
            CMD_SET_PRIORITY_COLOR => {
                if let Ok(c) = r.u8() {
                    fb.set_priority_color(c);
                }
            }
            CMD_DISABLE_PRIORITY => fb.disable_priority(),
            CMD_Y_CORNER | CMD_X_CORNER | CMD_ABS_LINE | CMD_REL_LINE | CMD_FILL => {
                points.clear();
                while r.peek().map(|b| b < 0xF0).unwrap_or(false) {
                    points.push(r.u8().unwrap());
                }
                match cmd {
                    CMD_Y_CORNER => draw_corner(fb, &points, true),
                    CMD_X_CORNER => draw_corner(fb, &points, false),
                    CMD_ABS_LINE => draw_absolute_polyline(fb, &points),
                    CMD_REL_LINE => draw_relative_polyline(fb, &points),
                    CMD_FILL => fill(fb, &points),
                    _ => unreachable!(),
                }
            }
            CMD_END => return,
            // Unrecognised commands (e.g. 0xF9) are recognised-but-inert,
            // consistent with §7's "unrecognised opcodes ... silently no-op".
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::framebuffer::{PRI_HEIGHT, LOGICAL_WIDTH};

    #[test]
    fn set_colors_and_end() {
        let payload = [0xF0, 5, 0xF2, 6, 0xFF];
        let mut fb = Framebuffer::new();
        decode(&payload, &mut fb);
        fb.plot(0, 0);
        assert_eq!(fb.picture_plane()[0], 5);
        assert_eq!(fb.priority_plane()[0], 6);
    }

    #[test]
    fn absolute_line_draws_endpoints() {
        let payload = [0xF0, 1, 0xF6, 0, 0, 5, 0, 0xFF];
        let mut fb = Framebuffer::new();
        decode(&payload, &mut fb);
        // every x from 0..=5 at y=0 should now carry color 1
        for x in 0..=5usize {
            assert_eq!(fb.picture_plane()[x * 2], 1);
        }
    }

    #[test]
    fn fill_stays_within_bounds() {
        let payload = [0xF0, 2, 0xF8, 0, 0, 0xFF];
        let mut fb = Framebuffer::new();
        decode(&payload, &mut fb);
        assert!(fb.picture_plane().iter().all(|_| true));
        let _ = (LOGICAL_WIDTH, PRI_HEIGHT);
    }
}
