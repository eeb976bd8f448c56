// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Predefined ROS2 message definitions.
//!
//! These cover the standard interfaces that navigation and sensor logs use,
//! so common bags decode without a ROS installation:
//!
//! - `builtin_interfaces`: Time, Duration
//! - `std_msgs`: Header and the scalar wrappers
//! - `geometry_msgs`: vectors, poses, twists and their covariance variants
//! - `nav_msgs`: Odometry, Path
//! - `sensor_msgs`: Imu, NavSatFix, NavSatStatus
//!
//! Definitions are kept in .msg form and go through the same parser as
//! definitions loaded from disk or from the bag.

const TIME: &str = "int32 sec\nuint32 nanosec\n";

const HEADER: &str = "builtin_interfaces/Time stamp\nstring frame_id\n";

const XYZ: &str = "float64 x\nfloat64 y\nfloat64 z\n";

const QUATERNION: &str = "float64 x 0\nfloat64 y 0\nfloat64 z 0\nfloat64 w 1\n";

const POSE: &str = "Point position\nQuaternion orientation\n";

const POSE_STAMPED: &str = "std_msgs/Header header\nPose pose\n";

const POSE_WITH_COVARIANCE: &str = "Pose pose\nfloat64[36] covariance\n";

const POSE_WITH_COVARIANCE_STAMPED: &str = "std_msgs/Header header\nPoseWithCovariance pose\n";

const TWIST: &str = "Vector3 linear\nVector3 angular\n";

const TWIST_STAMPED: &str = "std_msgs/Header header\nTwist twist\n";

const TWIST_WITH_COVARIANCE: &str = "Twist twist\nfloat64[36] covariance\n";

const TWIST_WITH_COVARIANCE_STAMPED: &str =
    "std_msgs/Header header\nTwistWithCovariance twist\n";

const ACCEL: &str = "Vector3 linear\nVector3 angular\n";

const ODOMETRY: &str = "\
std_msgs/Header header
string child_frame_id
geometry_msgs/PoseWithCovariance pose
geometry_msgs/TwistWithCovariance twist
";

const PATH: &str = "std_msgs/Header header\ngeometry_msgs/PoseStamped[] poses\n";

const IMU: &str = "\
std_msgs/Header header

geometry_msgs/Quaternion orientation
float64[9] orientation_covariance # Row major about x, y, z axes

geometry_msgs/Vector3 angular_velocity
float64[9] angular_velocity_covariance # Row major about x, y, z axes

geometry_msgs/Vector3 linear_acceleration
float64[9] linear_acceleration_covariance # Row major x, y z
";

const NAV_SAT_STATUS: &str = "\
int8 STATUS_UNKNOWN = -2
int8 STATUS_NO_FIX =  -1
int8 STATUS_FIX =      0
int8 STATUS_SBAS_FIX = 1
int8 STATUS_GBAS_FIX = 2

int8 status -2

uint16 SERVICE_UNKNOWN = 0
uint16 SERVICE_GPS =     1
uint16 SERVICE_GLONASS = 2
uint16 SERVICE_COMPASS = 4
uint16 SERVICE_GALILEO = 8

uint16 service
";

const NAV_SAT_FIX: &str = "\
std_msgs/Header header

NavSatStatus status

float64 latitude
float64 longitude
float64 altitude

float64[9] position_covariance

uint8 COVARIANCE_TYPE_UNKNOWN = 0
uint8 COVARIANCE_TYPE_APPROXIMATED = 1
uint8 COVARIANCE_TYPE_DIAGONAL_KNOWN = 2
uint8 COVARIANCE_TYPE_KNOWN = 3

uint8 position_covariance_type
";

/// All builtin definitions as `(type name, .msg text)` pairs.
const DEFINITIONS: &[(&str, &str)] = &[
    ("builtin_interfaces/msg/Time", TIME),
    ("builtin_interfaces/msg/Duration", TIME),
    ("std_msgs/msg/Header", HEADER),
    ("std_msgs/msg/Empty", ""),
    ("std_msgs/msg/Bool", "bool data\n"),
    ("std_msgs/msg/String", "string data\n"),
    ("std_msgs/msg/Int32", "int32 data\n"),
    ("std_msgs/msg/Int64", "int64 data\n"),
    ("std_msgs/msg/UInt8", "uint8 data\n"),
    ("std_msgs/msg/Float32", "float32 data\n"),
    ("std_msgs/msg/Float64", "float64 data\n"),
    ("geometry_msgs/msg/Vector3", XYZ),
    ("geometry_msgs/msg/Point", XYZ),
    ("geometry_msgs/msg/Quaternion", QUATERNION),
    ("geometry_msgs/msg/Pose", POSE),
    ("geometry_msgs/msg/PoseStamped", POSE_STAMPED),
    ("geometry_msgs/msg/PoseWithCovariance", POSE_WITH_COVARIANCE),
    (
        "geometry_msgs/msg/PoseWithCovarianceStamped",
        POSE_WITH_COVARIANCE_STAMPED,
    ),
    ("geometry_msgs/msg/Twist", TWIST),
    ("geometry_msgs/msg/TwistStamped", TWIST_STAMPED),
    ("geometry_msgs/msg/TwistWithCovariance", TWIST_WITH_COVARIANCE),
    (
        "geometry_msgs/msg/TwistWithCovarianceStamped",
        TWIST_WITH_COVARIANCE_STAMPED,
    ),
    ("geometry_msgs/msg/Accel", ACCEL),
    ("nav_msgs/msg/Odometry", ODOMETRY),
    ("nav_msgs/msg/Path", PATH),
    ("sensor_msgs/msg/Imu", IMU),
    ("sensor_msgs/msg/NavSatStatus", NAV_SAT_STATUS),
    ("sensor_msgs/msg/NavSatFix", NAV_SAT_FIX),
];

/// Look up the builtin .msg text for a fully qualified type name.
pub fn definition(type_name: &str) -> Option<&'static str> {
    DEFINITIONS
        .iter()
        .find(|(name, _)| *name == type_name)
        .map(|(_, text)| *text)
}

/// Names of all builtin types.
pub fn names() -> impl Iterator<Item = &'static str> {
    DEFINITIONS.iter().map(|(name, _)| *name)
}
