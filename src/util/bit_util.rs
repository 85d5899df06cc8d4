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

/// Returns the minimum number of bits needed to represent `x`.
/// Zero needs no bits.
pub fn num_required_bits(x: u64) -> u8 {
    (64 - x.leading_zeros()) as u8
}

/// Bit width of a definition or repetition level with the given maximum.
/// A max level of zero needs no level data at all.
pub fn level_bit_width(max_level: i16) -> u8 {
    if max_level <= 0 {
        0
    } else {
        num_required_bits(max_level as u64)
    }
}

/// Number of whole bytes needed to hold `bit_width` bits.
pub fn bytes_for_bits(bit_width: u8) -> usize {
    (bit_width as usize + 7) / 8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_required_bits() {
        assert_eq!(num_required_bits(0), 0);
        assert_eq!(num_required_bits(1), 1);
        assert_eq!(num_required_bits(2), 2);
        assert_eq!(num_required_bits(3), 2);
        assert_eq!(num_required_bits(7), 3);
        assert_eq!(num_required_bits(8), 4);
        assert_eq!(num_required_bits(u64::MAX), 64);
    }

    #[test]
    fn test_level_bit_width() {
        assert_eq!(level_bit_width(0), 0);
        assert_eq!(level_bit_width(1), 1);
        assert_eq!(level_bit_width(2), 2);
        assert_eq!(level_bit_width(3), 2);
        assert_eq!(level_bit_width(4), 3);
    }

    #[test]
    fn test_bytes_for_bits() {
        assert_eq!(bytes_for_bits(0), 0);
        assert_eq!(bytes_for_bits(1), 1);
        assert_eq!(bytes_for_bits(8), 1);
        assert_eq!(bytes_for_bits(9), 2);
        assert_eq!(bytes_for_bits(16), 2);
    }
}
