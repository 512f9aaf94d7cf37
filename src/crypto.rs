// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/crypto.rs - Keystream cipher used by FZ and CAE files.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

//! RC6-32/20/16 in 8-bit cipher feedback mode with an all-zero IV.

pub type ExpandedKey = [u32; 44];

pub const FZ_EXPANDED_KEY: ExpandedKey = [
    0x25d8d248, 0xe1502405, 0x56b5d486, 0x69213fe0, 0xa22490ec, 0x01fdd9fa, 0x0681955f, 0x0fac202d,
    0xdac9eeb4, 0xf6024aba, 0xcd8b4cc6, 0x9f307c8e, 0x4ab8fad7, 0x232f967d, 0x5e8666a3, 0xde966d4b,
    0xc64bfb1c, 0xea7fb092, 0x1a751a7e, 0x37e8f0bc, 0x3359c8f3, 0x969ac22b, 0x610f5804, 0xd99d10e6,
    0xc58d54d6, 0x1f9aea8b, 0x8e388c1a, 0xe4f7d2ed, 0x3e5da1f6, 0xedfe818a, 0x7252b016, 0xb503a170,
    0xc4128fb6, 0x2c93ceeb, 0x53539a6e, 0xdacf7668, 0x3ab78e52, 0x8ee9d815, 0x7043f799, 0xc6a05dcf,
    0x727f1da2, 0x0dfd983b, 0x78c53872, 0x00945692,
];

pub const CAE_EXPANDED_KEY: ExpandedKey = [
    0x477fa6a2, 0xfb9b5e2b, 0x77bcac57, 0x2d7cef8c, 0x69825182, 0xfa231194, 0x96ee6d48, 0x520a9b74,
    0x0619cb60, 0x95918dfb, 0x1c829771, 0x03f6655c, 0xbba3b302, 0xf3cbcc66, 0xb42e9ac7, 0x417b37dd,
    0x34854b8c, 0xf95a9547, 0x7950401e, 0xc3271f83, 0x0e7c9a6e, 0xcfa7f799, 0x616d9d05, 0x200ac08f,
    0x7cdb242f, 0x30d3bc5e, 0x2983cc29, 0x9da249c9, 0x7509f015, 0x6632580e, 0x83247f04, 0x6525ed71,
    0x02fa242a, 0x47b12928, 0x7ed51b5d, 0xf69cd51b, 0x66f24c77, 0x042856b9, 0x00e37970, 0x88b6624d,
    0x6826cd76, 0xd2a4c9fe, 0x2eff487a, 0x09648fae,
];

const LOGW: u32 = 5;
const ROUNDS: usize = 20;

fn word(block: &[u8; 16], index: usize) -> u32 {
    let offset = index * 4;
    u32::from_le_bytes([
        block[offset],
        block[offset + 1],
        block[offset + 2],
        block[offset + 3],
    ])
}

fn rc6_encrypt_block(block: &[u8; 16], key: &ExpandedKey) -> [u32; 4] {
    let [mut a, mut b, mut c, mut d] = [0, 1, 2, 3].map(|i| word(block, i));

    b = b.wrapping_add(key[0]);
    d = d.wrapping_add(key[1]);

    for i in 1..=ROUNDS {
        let t = b.wrapping_mul(b.wrapping_mul(2).wrapping_add(1)).rotate_left(LOGW);
        let u = d.wrapping_mul(d.wrapping_mul(2).wrapping_add(1)).rotate_left(LOGW);
        a = (a ^ t).rotate_left(u).wrapping_add(key[2 * i]);
        c = (c ^ u).rotate_left(t).wrapping_add(key[2 * i + 1]);

        (a, b, c, d) = (b, c, d, a);
    }

    a = a.wrapping_add(key[2 * ROUNDS + 2]);
    c = c.wrapping_add(key[2 * ROUNDS + 3]);

    [a, b, c, d]
}

/// Shift register state for CFB-8.
struct Cfb8<'a> {
    key: &'a ExpandedKey,
    register: [u8; 16],
}

impl<'a> Cfb8<'a> {
    fn new(key: &'a ExpandedKey) -> Self {
        Self {
            key,
            register: [0; 16],
        }
    }

    fn pad(&self) -> u8 {
        rc6_encrypt_block(&self.register, self.key)[0].to_le_bytes()[0]
    }

    fn feed(&mut self, ciphertext: u8) {
        self.register.copy_within(1..16, 0);
        self.register[15] = ciphertext;
    }

    fn decrypt(&mut self, byte: u8) -> u8 {
        let plain = byte ^ self.pad();
        self.feed(byte);
        plain
    }

    #[cfg(test)]
    fn encrypt(&mut self, byte: u8) -> u8 {
        let cipher = byte ^ self.pad();
        self.feed(cipher);
        cipher
    }
}

pub fn decrypt(data: &[u8], key: &ExpandedKey) -> Vec<u8> {
    let mut cipher = Cfb8::new(key);
    data.iter().map(|&b| cipher.decrypt(b)).collect()
}

#[cfg(test)]
pub fn encrypt(data: &[u8], key: &ExpandedKey) -> Vec<u8> {
    let mut cipher = Cfb8::new(key);
    data.iter().map(|&b| cipher.encrypt(b)).collect()
}

// Key schedule for RC6-32/20/16
#[cfg(test)]
fn expand_key(user_key: &[u8; 16]) -> ExpandedKey {
    const P_32: u32 = 0xB7E15163;
    const Q_32: u32 = 0x9E3779B9;

    let mut l = [0, 1, 2, 3].map(|i| word(user_key, i));
    let mut s = [0u32; 44];
    s[0] = P_32;
    for i in 1..s.len() {
        s[i] = s[i - 1].wrapping_add(Q_32);
    }

    let (mut a, mut b) = (0u32, 0u32);
    for n in 0..3 * s.len() {
        let i = n % s.len();
        let j = n % l.len();
        s[i] = s[i].wrapping_add(a).wrapping_add(b).rotate_left(3);
        a = s[i];
        l[j] = l[j].wrapping_add(a).wrapping_add(b).rotate_left(a.wrapping_add(b));
        b = l[j];
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rc6_encrypt_block() {
        let expected = [
            0x8f, 0xc3, 0xa5, 0x36, 0x56, 0xb1, 0xf7, 0x78, 0xc1, 0x29, 0xdf, 0x4e, 0x98, 0x48,
            0xa4, 0x1e,
        ];
        let key = expand_key(&[0; 16]);
        let words = rc6_encrypt_block(&[0; 16], &key);
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_decrypt() {
        let data = b"A!UNIT!mils\r\n";
        for key in [&FZ_EXPANDED_KEY, &CAE_EXPANDED_KEY] {
            let encrypted = encrypt(data, key);
            assert_ne!(encrypted.as_slice(), data.as_slice());
            assert_eq!(decrypt(&encrypted, key), data);
        }
    }
}
