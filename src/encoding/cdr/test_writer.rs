// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Little-endian CDR writer for building test payloads.
//!
//! Shared by the decoder unit tests and the integration test helpers.

#![allow(dead_code)]

/// Little-endian CDR writer. Alignment is relative to the end of the header.
pub struct CdrWriter {
    buf: Vec<u8>,
}

impl Default for CdrWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CdrWriter {
    pub fn new() -> Self {
        Self {
            buf: vec![0x00, 0x01, 0x00, 0x00],
        }
    }

    fn align(&mut self, size: usize) {
        while (self.buf.len() - 4) % size != 0 {
            self.buf.push(0);
        }
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    pub fn i8(&mut self, v: i8) -> &mut Self {
        self.u8(v as u8)
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.align(2);
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.align(4);
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.align(4);
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn f32(&mut self, v: f32) -> &mut Self {
        self.align(4);
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn f64(&mut self, v: f64) -> &mut Self {
        self.align(8);
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn string(&mut self, v: &str) -> &mut Self {
        self.u32(v.len() as u32 + 1);
        self.buf.extend_from_slice(v.as_bytes());
        self.buf.push(0);
        self
    }

    /// `std_msgs/Header`
    pub fn header(&mut self, sec: i32, nanosec: u32, frame_id: &str) -> &mut Self {
        self.i32(sec).u32(nanosec).string(frame_id)
    }

    pub fn finish(&self) -> Vec<u8> {
        self.buf.clone()
    }
}
