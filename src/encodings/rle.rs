// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! RLE/bit-packed hybrid encoding as used for definition/repetition levels
//! and dictionary indices.
//!
//! The stream is a sequence of runs, each starting with a varint indicator:
//!
//! ```text
//! rle-run      := varint(count << 1)       value:⌈w/8⌉ bytes LE
//! literal-run  := varint(groups << 1 | 1)  groups * 8 values bit-packed
//! ```
//!
//! Bit-packing is LSB first within each byte, low-order bit of each value
//! first.

use crate::util::bit_util::bytes_for_bits;

/// Number of values per bit-packed literal group.
const BIT_PACKED_GROUP_SIZE: usize = 8;

/// Shortest run of equal values the encoder will emit as an RLE run.
const MINIMUM_RLE_COUNT: usize = 4;

/// Decoder for the RLE/bit-packed hybrid format.
///
/// The decoder emits exactly as many values as asked for and never reads past
/// the end of the supplied slice; once the input runs dry the remaining
/// output is zero-filled. A bit width of zero decodes to all zeros without
/// consuming input.
pub struct RleDecoder<'a> {
    data: &'a [u8],
    pos: usize,
    bit_width: u8,
    repeat_count: usize,
    current_value: u64,
    literal_count: usize,
    literal_buf: &'a [u8],
    literal_bit_offset: usize,
}

impl<'a> RleDecoder<'a> {
    /// Create a decoder over `data` with values of `bit_width` bits.
    pub fn new(data: &'a [u8], bit_width: u8) -> Self {
        Self {
            data,
            pos: 0,
            bit_width,
            repeat_count: 0,
            current_value: 0,
            literal_count: 0,
            literal_buf: &[],
            literal_bit_offset: 0,
        }
    }

    /// Decode the next `out.len()` values.
    pub fn get_batch(&mut self, out: &mut [u32]) {
        if self.bit_width == 0 {
            out.fill(0);
            return;
        }
        let mut i = 0;
        while i < out.len() {
            if self.repeat_count == 0 && self.literal_count == 0 {
                if !self.next_counts() {
                    out[i..].fill(0);
                    return;
                }
                continue;
            }
            if self.repeat_count > 0 {
                out[i] = self.current_value as u32;
                self.repeat_count -= 1;
            } else {
                out[i] = self.read_literal_value() as u32;
                self.literal_count -= 1;
            }
            i += 1;
        }
    }

    /// Read the next run header. Returns false once the input is exhausted.
    fn next_counts(&mut self) -> bool {
        if self.pos >= self.data.len() {
            return false;
        }
        let indicator = self.read_varint();
        if indicator & 1 == 1 {
            // literal run of groups * 8 bit-packed values
            let groups = (indicator >> 1) as usize;
            self.literal_count = groups * BIT_PACKED_GROUP_SIZE;
            let bytes_needed = groups * self.bit_width as usize;
            let available = bytes_needed.min(self.data.len() - self.pos);
            self.literal_buf = &self.data[self.pos..self.pos + available];
            self.literal_bit_offset = 0;
            self.pos += available;
        } else {
            self.repeat_count = (indicator >> 1) as usize;
            self.current_value = self.read_fixed_width_value();
        }
        true
    }

    /// Read one value from the current bit-packed group. Bits beyond the end
    /// of the input read as zero.
    fn read_literal_value(&mut self) -> u64 {
        let mut val = 0u64;
        for i in 0..self.bit_width {
            let byte_idx = self.literal_bit_offset / 8;
            let bit_idx = self.literal_bit_offset % 8;
            if let Some(byte) = self.literal_buf.get(byte_idx) {
                if byte & (1 << bit_idx) != 0 {
                    val |= 1 << i;
                }
            }
            self.literal_bit_offset += 1;
        }
        val
    }

    /// Unchecked varint read that simply stops at the end of the input.
    fn read_varint(&mut self) -> u64 {
        let mut result = 0u64;
        let mut shift = 0u32;
        while self.pos < self.data.len() {
            let byte = self.data[self.pos];
            self.pos += 1;
            result |= ((byte & 0x7f) as u64).wrapping_shl(shift);
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
        }
        result
    }

    /// Read the ⌈w/8⌉-byte little-endian value of a repeated run. Missing
    /// trailing bytes read as zero.
    fn read_fixed_width_value(&mut self) -> u64 {
        let bytes_needed = bytes_for_bits(self.bit_width);
        let mut val = 0u64;
        for i in 0..bytes_needed {
            if self.pos >= self.data.len() {
                break;
            }
            val |= (self.data[self.pos] as u64) << (i * 8);
            self.pos += 1;
        }
        val
    }
}

/// Encoder for the RLE/bit-packed hybrid format.
///
/// Runs of at least [`MINIMUM_RLE_COUNT`] equal values become RLE runs;
/// anything shorter is folded into bit-packed groups of eight. The final
/// partial group is zero-padded.
pub struct RleEncoder {
    bit_width: u8,
    byte_width: usize,
    rle_count: usize,
    rle_value: u32,
    bp_buffer: [u32; BIT_PACKED_GROUP_SIZE],
    bp_count: usize,
    buffer: Vec<u8>,
}

impl RleEncoder {
    /// Create an encoder for values of `bit_width` bits.
    pub fn new(bit_width: u8) -> Self {
        Self {
            bit_width,
            byte_width: bytes_for_bits(bit_width),
            rle_count: 0,
            rle_value: 0,
            bp_buffer: [0; BIT_PACKED_GROUP_SIZE],
            bp_count: 0,
            buffer: Vec::new(),
        }
    }

    /// Append one value to the stream.
    pub fn put(&mut self, value: u32) {
        if self.bp_count != 0 {
            // already committed to a bit-packed run
            self.bp_buffer[self.bp_count] = value;
            self.bp_count += 1;
            if self.bp_count == BIT_PACKED_GROUP_SIZE {
                self.flush_bit_packed();
            }
            return;
        }

        if self.rle_count == 0 {
            self.rle_value = value;
            self.rle_count = 1;
            return;
        }

        if self.rle_value == value {
            self.rle_count += 1;
            return;
        }

        if self.rle_count >= MINIMUM_RLE_COUNT {
            // long enough for an RLE run, flush it and start over
            self.flush_rle();
            self.rle_value = value;
            self.rle_count = 1;
            return;
        }

        // too short for RLE, convert into the start of a bit-packed group
        for i in 0..self.rle_count {
            self.bp_buffer[i] = self.rle_value;
        }
        self.bp_buffer[self.rle_count] = value;
        self.bp_count = self.rle_count + 1;
        self.rle_count = 0;
        if self.bp_count == BIT_PACKED_GROUP_SIZE {
            self.flush_bit_packed();
        }
    }

    /// Flush pending state and return the encoded bytes.
    pub fn consume(mut self) -> Vec<u8> {
        if self.rle_count > 0 {
            self.flush_rle();
        } else if self.bp_count > 0 {
            // pad the partial group with zeros
            for i in self.bp_count..BIT_PACKED_GROUP_SIZE {
                self.bp_buffer[i] = 0;
            }
            self.bp_count = BIT_PACKED_GROUP_SIZE;
            self.flush_bit_packed();
        }
        self.buffer
    }

    fn flush_rle(&mut self) {
        write_varint(&mut self.buffer, (self.rle_count as u64) << 1);
        let mut val = self.rle_value;
        for _ in 0..self.byte_width {
            self.buffer.push(val as u8);
            val >>= 8;
        }
        self.rle_count = 0;
    }

    fn flush_bit_packed(&mut self) {
        // one group of 8 values
        write_varint(&mut self.buffer, 1 << 1 | 1);
        let start = self.buffer.len();
        self.buffer.resize(start + self.bit_width as usize, 0);
        let mut bit_offset = 0;
        for &val in &self.bp_buffer {
            for b in 0..self.bit_width {
                if val & (1 << b) != 0 {
                    self.buffer[start + bit_offset / 8] |= 1 << (bit_offset % 8);
                }
                bit_offset += 1;
            }
        }
        self.bp_count = 0;
    }
}

/// RLE-encode a level sequence using repeated runs only, one run per stretch
/// of equal adjacent levels. This is all the writer needs for definition
/// levels, which only ever alternate between 0 and the maximum.
pub fn encode_rle_levels(levels: &[i16], bit_width: u8) -> Vec<u8> {
    let mut result = Vec::new();
    if levels.is_empty() || bit_width == 0 {
        return result;
    }
    let value_bytes = bytes_for_bits(bit_width);
    let mut i = 0;
    while i < levels.len() {
        let current = levels[i];
        let mut run_len = 1;
        while i + run_len < levels.len() && levels[i + run_len] == current {
            run_len += 1;
        }
        write_varint(&mut result, (run_len as u64) << 1);
        let mut val = current as u64;
        for _ in 0..value_bytes {
            result.push(val as u8);
            val >>= 8;
        }
        i += run_len;
    }
    result
}

fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push(value as u8 | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::bit_util::num_required_bits;
    use rand::{thread_rng, Rng};

    fn roundtrip(values: &[u32], bit_width: u8) -> Vec<u32> {
        let mut encoder = RleEncoder::new(bit_width);
        for &v in values {
            encoder.put(v);
        }
        let encoded = encoder.consume();
        let mut decoder = RleDecoder::new(&encoded, bit_width);
        let mut out = vec![0u32; values.len()];
        decoder.get_batch(&mut out);
        out
    }

    #[test]
    fn test_rle_run_then_bit_packed() {
        // five equal values flush as an RLE run; the four trailing zeros form
        // a second run
        let values = [1u32, 1, 1, 1, 1, 0, 0, 0, 0];
        let mut encoder = RleEncoder::new(1);
        for &v in &values {
            encoder.put(v);
        }
        let encoded = encoder.consume();
        // header (5 << 1), value 0x01
        assert_eq!(&encoded[..2], &[0x0a, 0x01]);
        let mut decoder = RleDecoder::new(&encoded, 1);
        let mut out = vec![0u32; values.len()];
        decoder.get_batch(&mut out);
        assert_eq!(out, values);
    }

    #[test]
    fn test_short_runs_become_bit_packed() {
        let values = [0u32, 1, 0, 1, 0, 1, 0, 1];
        let mut encoder = RleEncoder::new(1);
        for &v in &values {
            encoder.put(v);
        }
        let encoded = encoder.consume();
        // literal header (1 << 1 | 1), then 0b10101010
        assert_eq!(encoded, vec![0x03, 0xaa]);
        let mut decoder = RleDecoder::new(&encoded, 1);
        let mut out = vec![0u32; values.len()];
        decoder.get_batch(&mut out);
        assert_eq!(out, values);
    }

    #[test]
    fn test_partial_group_is_zero_padded() {
        let values = [5u32, 6, 7];
        assert_eq!(roundtrip(&values, 3), values);
    }

    #[test]
    fn test_wide_values() {
        let values = [0u32, 1, 127, 128, 255, 255, 255, 255, 255, 12];
        assert_eq!(roundtrip(&values, 8), values);
        let values = [70000u32, 70000, 70000, 70000, 70000, 3];
        assert_eq!(roundtrip(&values, 17), values);
    }

    #[test]
    fn test_zero_bit_width_decodes_zeros() {
        let mut decoder = RleDecoder::new(&[0xde, 0xad], 0);
        let mut out = vec![9u32; 4];
        decoder.get_batch(&mut out);
        assert_eq!(out, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_exhausted_input_fills_zeros() {
        // a single RLE run of three ones, then the input ends
        let encoded = [0x06u8, 0x01];
        let mut decoder = RleDecoder::new(&encoded, 1);
        let mut out = vec![7u32; 6];
        decoder.get_batch(&mut out);
        assert_eq!(out, vec![1, 1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_batched_reads_keep_state() {
        let values = [3u32, 3, 3, 3, 3, 3, 1, 2, 1, 2, 2, 2, 2, 2];
        let mut encoder = RleEncoder::new(2);
        for &v in &values {
            encoder.put(v);
        }
        let encoded = encoder.consume();
        let mut decoder = RleDecoder::new(&encoded, 2);
        let mut out = vec![0u32; values.len()];
        for chunk in out.chunks_mut(3) {
            decoder.get_batch(chunk);
        }
        assert_eq!(out, values);
    }

    #[test]
    fn test_encode_rle_levels() {
        // [1,1,1,0,0,1] at width 1: runs of 3, 2, 1
        let levels = [1i16, 1, 1, 0, 0, 1];
        let encoded = encode_rle_levels(&levels, 1);
        assert_eq!(encoded, vec![0x06, 0x01, 0x04, 0x00, 0x02, 0x01]);
        let mut decoder = RleDecoder::new(&encoded, 1);
        let mut out = vec![0u32; levels.len()];
        decoder.get_batch(&mut out);
        let out: Vec<i16> = out.iter().map(|&v| v as i16).collect();
        assert_eq!(out, levels);
    }

    #[test]
    fn test_random_roundtrip() {
        let mut rng = thread_rng();
        for _ in 0..20 {
            let max: u32 = rng.gen_range(1..100);
            let bit_width = num_required_bits(max as u64);
            let len = rng.gen_range(0..200);
            let values: Vec<u32> = (0..len).map(|_| rng.gen_range(0..=max)).collect();
            assert_eq!(roundtrip(&values, bit_width), values, "width {bit_width}");
        }
    }
}
