use crate::geometry::Point;

fn is_command(c: u8) -> bool {
    matches!(
        c,
        b'M' | b'm'
            | b'L'
            | b'l'
            | b'H'
            | b'h'
            | b'V'
            | b'v'
            | b'C'
            | b'c'
            | b'S'
            | b's'
            | b'Q'
            | b'q'
            | b'T'
            | b't'
            | b'A'
            | b'a'
            | b'Z'
            | b'z'
    )
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(d: &'a str) -> Self {
        Scanner {
            bytes: d.as_bytes(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn skip_separators(&mut self) {
        while let Some(&c) = self.bytes.get(self.pos) {
            if c.is_ascii_whitespace() || c == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn command(&mut self) -> Option<u8> {
        self.skip_separators();
        let c = *self.bytes.get(self.pos)?;
        if is_command(c) {
            self.pos += 1;
            Some(c)
        } else {
            None
        }
    }

    fn eat_digits(&mut self) -> usize {
        let start = self.pos;
        while self.bytes.get(self.pos).is_some_and(u8::is_ascii_digit) {
            self.pos += 1;
        }
        self.pos - start
    }

    /// Parse one number. `"0.5.5"` yields two numbers and `"1-2"` two as
    /// well, as SVG allows. Non-finite results are consumed but rejected.
    fn number(&mut self) -> Option<f64> {
        self.skip_separators();
        let start = self.pos;
        if matches!(self.bytes.get(self.pos), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut digits = self.eat_digits();
        if self.bytes.get(self.pos) == Some(&b'.') {
            self.pos += 1;
            digits += self.eat_digits();
        }
        if digits == 0 {
            self.pos = start;
            return None;
        }
        if matches!(self.bytes.get(self.pos), Some(b'e' | b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.bytes.get(self.pos), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.eat_digits() == 0 {
                self.pos = mark;
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).ok()?;
        text.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Arc flags are single `0`/`1` characters and may be packed (`"011"`).
    fn flag(&mut self) -> Option<bool> {
        self.skip_separators();
        let flag = match self.bytes.get(self.pos)? {
            b'0' => false,
            b'1' => true,
            _ => return None,
        };
        self.pos += 1;
        Some(flag)
    }

    fn point(&mut self, origin: Point) -> Option<Point> {
        let x = self.number()?;
        let y = self.number()?;
        Some(Point::new(origin.x + x, origin.y + y))
    }

    /// Step over one unusable byte unless it starts a command.
    fn recover(&mut self, before: usize) {
        if self.pos == before && !self.at_end() && !is_command(self.bytes[self.pos]) {
            self.pos += 1;
        }
    }
}

/// Call `visit` with every absolute coordinate in path data `d`, curve
/// control points included. Arcs contribute their endpoints. Malformed input
/// is skipped byte by byte rather than rejected.
pub fn visit_points(d: &str, mut visit: impl FnMut(Point)) {
    let mut scan = Scanner::new(d);
    let mut current = Point::ZERO;
    let mut subpath_start = Point::ZERO;
    let mut active: Option<u8> = None;

    loop {
        scan.skip_separators();
        if scan.at_end() {
            break;
        }
        let before = scan.pos;
        if let Some(cmd) = scan.command() {
            active = Some(cmd);
        }
        let Some(cmd) = active else {
            scan.recover(before);
            continue;
        };
        let segment_start = scan.pos;
        let origin = if cmd.is_ascii_lowercase() {
            current
        } else {
            Point::ZERO
        };

        let parsed = match cmd.to_ascii_uppercase() {
            b'Z' => {
                current = subpath_start;
                active = None;
                continue;
            }
            b'M' => scan.point(origin).map(|p| {
                subpath_start = p;
                // Further pairs after a moveto are implicit linetos.
                active = Some(if cmd == b'm' { b'l' } else { b'L' });
                vec![p]
            }),
            b'L' | b'T' => scan.point(origin).map(|p| vec![p]),
            b'H' => scan.number().map(|x| vec![Point::new(origin.x + x, current.y)]),
            b'V' => scan.number().map(|y| vec![Point::new(current.x, origin.y + y)]),
            b'C' => (|| {
                Some(vec![
                    scan.point(origin)?,
                    scan.point(origin)?,
                    scan.point(origin)?,
                ])
            })(),
            b'S' | b'Q' => (|| Some(vec![scan.point(origin)?, scan.point(origin)?]))(),
            b'A' => (|| {
                scan.number()?;
                scan.number()?;
                scan.number()?;
                scan.flag()?;
                scan.flag()?;
                Some(vec![scan.point(origin)?])
            })(),
            _ => None,
        };

        match parsed {
            Some(points) => {
                for p in &points {
                    visit(*p);
                }
                if let Some(last) = points.last() {
                    current = *last;
                }
            }
            None => scan.recover(segment_start),
        }
    }
}

/// Collect every absolute coordinate in `d`.
pub fn points(d: &str) -> Vec<Point> {
    let mut out = Vec::new();
    visit_points(d, |p| out.push(p));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy(points: &[Point]) -> Vec<(f64, f64)> {
        points.iter().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn test_absolute_polygon() {
        let pts = points("M10 20 L30 40 L50 20 Z");
        assert_eq!(xy(&pts), vec![(10.0, 20.0), (30.0, 40.0), (50.0, 20.0)]);
    }

    #[test]
    fn test_relative_moveto_implicit_lineto() {
        let pts = points("m10,10 5,0 0,5 -5,0z");
        assert_eq!(
            xy(&pts),
            vec![(10.0, 10.0), (15.0, 10.0), (15.0, 15.0), (10.0, 15.0)]
        );
    }

    #[test]
    fn test_horizontal_vertical() {
        let pts = points("M0 0 H100 v50 h-25 V10");
        assert_eq!(
            xy(&pts),
            vec![(0.0, 0.0), (100.0, 0.0), (100.0, 50.0), (75.0, 50.0), (75.0, 10.0)]
        );
    }

    #[test]
    fn test_cubic_includes_control_points() {
        let pts = points("M0 0 C10 -20 30 -20 40 0");
        assert_eq!(
            xy(&pts),
            vec![(0.0, 0.0), (10.0, -20.0), (30.0, -20.0), (40.0, 0.0)]
        );
    }

    #[test]
    fn test_relative_cubic_uses_segment_start() {
        let pts = points("M100 100 c10 10 20 10 30 0 c10 10 20 10 30 0");
        let last = pts.last().unwrap();
        assert!((last.x - 160.0).abs() < 1e-9);
        assert!((last.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_arc_with_packed_flags() {
        let pts = points("M10 10 a5 5 0 0110 0");
        assert_eq!(xy(&pts), vec![(10.0, 10.0), (20.0, 10.0)]);
    }

    #[test]
    fn test_compact_number_forms() {
        let pts = points("M.5.5L-1-2");
        assert_eq!(xy(&pts), vec![(0.5, 0.5), (-1.0, -2.0)]);
    }

    #[test]
    fn test_exponent() {
        let pts = points("M1e2 2.5E-1");
        assert_eq!(xy(&pts), vec![(100.0, 0.25)]);
    }

    #[test]
    fn test_close_returns_to_subpath_start() {
        let pts = points("M10 10 L20 10 Z l5 5");
        assert_eq!(xy(&pts).last(), Some(&(15.0, 15.0)));
    }

    #[test]
    fn test_garbage_is_skipped_without_panicking() {
        assert!(points("").is_empty());
        assert!(points("hello world").is_empty());
        assert!(points("### 1 2 3").is_empty());
        let pts = points("M10 10 L ?? 20 20");
        assert_eq!(xy(&pts), vec![(10.0, 10.0), (20.0, 20.0)]);
    }

    #[test]
    fn test_non_finite_values_ignored() {
        let pts = points("M1e999 5 L3 4");
        assert_eq!(xy(&pts), vec![(3.0, 4.0)]);
    }
}
