#![allow(dead_code)]

#[derive(Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Bytes drawn from a small alphabet so that repeat runs actually occur.
    pub fn raster(&mut self, len: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(len);
        while out.len() < len {
            let value = (self.next_u64() % 4) as u8;
            let run = (self.next_u64() % 6) as usize + 1;
            out.extend(std::iter::repeat_n(value, run.min(len - out.len())));
        }
        out
    }
}

/// Reference PackBits encoder for one scanline.
pub fn pack_line(line: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0usize;
    while i < line.len() {
        let mut run = 1usize;
        while i + run < line.len() && run < 128 && line[i + run] == line[i] {
            run += 1;
        }
        if run >= 2 {
            out.push((257 - run) as u8);
            out.push(line[i]);
            i += run;
            continue;
        }

        let start = i;
        i += 1;
        while i < line.len() && i - start < 128 {
            if i + 1 < line.len() && line[i] == line[i + 1] {
                break;
            }
            i += 1;
        }
        out.push((i - start - 1) as u8);
        out.extend_from_slice(&line[start..i]);
    }
    out
}

/// Builds a compressed channel stream: length table followed by payload.
pub fn channel_from_lines(lines: &[Vec<u8>], large: bool) -> Vec<u8> {
    let mut table = Vec::new();
    let mut payload = Vec::new();
    for line in lines {
        if large {
            table.extend_from_slice(&(line.len() as u32).to_be_bytes());
        } else {
            table.extend_from_slice(&(line.len() as u16).to_be_bytes());
        }
        payload.extend_from_slice(line);
    }
    table.extend_from_slice(&payload);
    table
}

/// Compresses `raw` as `raw.len() / width` scanlines.
pub fn encode_channel(raw: &[u8], width: usize, large: bool) -> Vec<u8> {
    let lines: Vec<Vec<u8>> = raw.chunks(width).map(pack_line).collect();
    channel_from_lines(&lines, large)
}
