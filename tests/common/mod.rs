// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.
//!
//! Fixture bags are built on the fly: a rosbag2-shaped sqlite database plus
//! hand-encoded little-endian CDR payloads.

#![allow(dead_code)]

use std::path::Path;

use rusqlite::{params, Connection};

// ============================================================================
// CDR payloads
// ============================================================================

#[path = "../../src/encoding/cdr/test_writer.rs"]
mod cdr_writer;

pub use cdr_writer::CdrWriter;

/// `geometry_msgs/msg/Twist` payload.
pub fn twist_payload(linear: [f64; 3], angular: [f64; 3]) -> Vec<u8> {
    let mut w = CdrWriter::new();
    for v in linear.into_iter().chain(angular) {
        w.f64(v);
    }
    w.finish()
}

/// `nav_msgs/msg/Odometry` payload; covariance entries are `0..36` scaled by
/// `covariance_scale`.
pub fn odometry_payload(sec: i32, position: [f64; 3], covariance_scale: f64) -> Vec<u8> {
    let mut w = CdrWriter::new();
    w.header(sec, 0, "odom").string("base_link");
    for v in position.into_iter().chain([0.0, 0.0, 0.0, 1.0]) {
        w.f64(v);
    }
    for i in 0..36 {
        w.f64(i as f64 * covariance_scale);
    }
    for _ in 0..6 {
        w.f64(0.0);
    }
    for _ in 0..36 {
        w.f64(0.0);
    }
    w.finish()
}

/// `sensor_msgs/msg/NavSatFix` payload.
pub fn nav_sat_fix_payload(latitude: f64, longitude: f64, altitude: f64) -> Vec<u8> {
    let mut w = CdrWriter::new();
    w.header(1, 0, "gps").i8(0).u16(1);
    w.f64(latitude).f64(longitude).f64(altitude);
    for _ in 0..9 {
        w.f64(0.0);
    }
    w.u8(0);
    w.finish()
}

/// Payload too short for any message with a float64 field.
pub fn corrupt_payload() -> Vec<u8> {
    vec![0x00, 0x01, 0x00, 0x00, 0x01]
}

// ============================================================================
// Fixture bags
// ============================================================================

/// Writer for a rosbag2-shaped sqlite database.
pub struct FixtureBag {
    conn: Connection,
}

impl FixtureBag {
    /// Create the database with the rosbag2 schema.
    pub fn create(path: &Path) -> Self {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE schema (schema_version INTEGER PRIMARY KEY, ros_distro TEXT NOT NULL);
             CREATE TABLE metadata (id INTEGER PRIMARY KEY, metadata_version INTEGER NOT NULL,
                metadata TEXT NOT NULL);
             CREATE TABLE topics (id INTEGER PRIMARY KEY, name TEXT NOT NULL, type TEXT NOT NULL,
                serialization_format TEXT NOT NULL, offered_qos_profiles TEXT NOT NULL DEFAULT '',
                type_description_hash TEXT NOT NULL DEFAULT '');
             CREATE TABLE messages (id INTEGER PRIMARY KEY, topic_id INTEGER NOT NULL,
                timestamp INTEGER NOT NULL, data BLOB NOT NULL);
             CREATE INDEX timestamp_idx ON messages (timestamp ASC);",
        )
        .unwrap();
        Self { conn }
    }

    /// Add the `message_definitions` table (Jazzy and later).
    pub fn with_definitions_table(self) -> Self {
        self.conn
            .execute_batch(
                "CREATE TABLE message_definitions (id INTEGER PRIMARY KEY,
                    topic_type TEXT NOT NULL, encoding TEXT NOT NULL,
                    encoded_message_definition TEXT NOT NULL,
                    type_description_hash TEXT NOT NULL);",
            )
            .unwrap();
        self
    }

    pub fn topic(&self, id: i64, name: &str, type_name: &str) -> &Self {
        self.topic_with_format(id, name, type_name, "cdr")
    }

    pub fn topic_with_format(&self, id: i64, name: &str, type_name: &str, format: &str) -> &Self {
        self.conn
            .execute(
                "INSERT INTO topics (id, name, type, serialization_format) VALUES (?1, ?2, ?3, ?4)",
                params![id, name, type_name, format],
            )
            .unwrap();
        self
    }

    pub fn message(&self, topic_id: i64, timestamp: i64, payload: &[u8]) -> &Self {
        self.conn
            .execute(
                "INSERT INTO messages (topic_id, timestamp, data) VALUES (?1, ?2, ?3)",
                params![topic_id, timestamp, payload],
            )
            .unwrap();
        self
    }

    pub fn definition(&self, type_name: &str, encoding: &str, text: &str) -> &Self {
        self.conn
            .execute(
                "INSERT INTO message_definitions
                    (topic_type, encoding, encoded_message_definition, type_description_hash)
                    VALUES (?1, ?2, ?3, '')",
                params![type_name, encoding, text],
            )
            .unwrap();
        self
    }
}

/// A single-file bag with `/cmd_vel` (3 rows), `/odometry` (2 rows) and
/// `/gps/fix` (1 row).
pub fn sample_bag(path: &Path) {
    let bag = FixtureBag::create(path);
    bag.topic(1, "/cmd_vel", "geometry_msgs/msg/Twist")
        .topic(2, "/odometry", "nav_msgs/msg/Odometry")
        .topic(3, "/gps/fix", "sensor_msgs/msg/NavSatFix");

    bag.message(1, 100, &twist_payload([1.0, 0.0, 0.0], [0.0, 0.0, 0.5]))
        .message(2, 150, &odometry_payload(1, [1.0, 2.0, 3.0], 1.0))
        .message(1, 200, &twist_payload([2.0, 0.0, 0.0], [0.0, 0.0, -0.5]))
        .message(3, 250, &nav_sat_fix_payload(48.1, 11.5, 520.25))
        .message(2, 300, &odometry_payload(2, [4.0, 5.0, 6.0], 0.5))
        .message(1, 400, &twist_payload([0.1, 0.0, 0.0], [0.0, 0.0, 0.0]));
}

/// Read a CSV file as header plus rows of cells.
pub fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}
