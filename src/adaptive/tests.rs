use crate::adaptive::{schedule, SpeedCategory, SpeedScheduleController, UNKNOWN_SPEED_KMH};

fn assert_close(actual:f64, expected:f64) {
	assert!((actual - expected).abs() < 1e-9, "expected {}, got {}", expected, actual);
}

fn assert_schedule(speed_kmh:f64, search:f64, bandwidth:f64, reassignment:Option<f64>) {
	let p = schedule(speed_kmh).unwrap();
	assert_close(p.path_search_rate_hz, search);
	assert_close(p.tracking_bandwidth_hz, bandwidth);
	if let Some(r) = reassignment { assert_close(p.reassignment_period_s, r); }
}

#[test]
fn defaults() {
	let ctrl = SpeedScheduleController::new();
	assert_eq!(ctrl.path_search_rate(), 20.0);
	assert_eq!(ctrl.tracking_bandwidth(), 120.0);
	assert_eq!(ctrl.path_detection_threshold(), 0.5);
	assert_eq!(ctrl.lock_threshold(), 0.7);
	assert_eq!(ctrl.reassignment_period(), 1.0);
	assert_eq!(ctrl.gps_speed(), UNKNOWN_SPEED_KMH);
	assert!(!ctrl.adaptive_mode());
	assert_eq!(ctrl.speed_category(), None);
}

#[test]
fn category_boundaries_are_exact() {
	assert_schedule(  5.0,   5.0,  50.0, Some(2.0));
	assert_schedule( 15.0,  10.0, 100.0, Some(1.0));
	assert_schedule( 60.0,  20.0, 120.0, Some(1.0));
	assert_schedule(120.0,  50.0, 200.0, Some(0.5));
	assert_schedule(200.0, 100.0, 300.0, Some(0.25));

	assert_eq!(SpeedCategory::from_speed(5.0),   Some(SpeedCategory::Stationary));
	assert_eq!(SpeedCategory::from_speed(15.0),  Some(SpeedCategory::Pedestrian));
	assert_eq!(SpeedCategory::from_speed(60.0),  Some(SpeedCategory::VehicleLowSpeed));
	assert_eq!(SpeedCategory::from_speed(120.0), Some(SpeedCategory::VehicleHighSpeed));
	assert_eq!(SpeedCategory::from_speed(120.5), Some(SpeedCategory::VeryHighSpeed));
}

#[test]
fn bracket_midpoints_interpolate() {
	assert_schedule(10.0,   7.5,  75.0, Some(1.5));
	assert_schedule(37.5,  15.0, 110.0, Some(1.0));
	assert_schedule(90.0,  35.0, 160.0, Some(0.75));
	assert_schedule(160.0, 75.0, 250.0, Some(0.375));
}

#[test]
fn stationary_range_is_flat() {
	assert_schedule(0.0, 5.0, 50.0, Some(2.0));
	assert_schedule(2.5, 5.0, 50.0, Some(2.0));
}

#[test]
fn speeds_above_cap_are_clamped() {
	assert_schedule(250.0, 100.0, 300.0, Some(0.25));
	assert_schedule(1.0e6, 100.0, 300.0, Some(0.25));
}

#[test]
fn finger_recommendation_snaps_at_bracket_midpoints() {
	assert_eq!(schedule(0.0).unwrap().num_fingers, 3);
	assert_eq!(schedule(9.99).unwrap().num_fingers, 3);
	assert_eq!(schedule(12.0).unwrap().num_fingers, 3);
	assert_eq!(schedule(37.4).unwrap().num_fingers, 3);
	assert_eq!(schedule(37.5).unwrap().num_fingers, 4);
	assert_eq!(schedule(61.0).unwrap().num_fingers, 4);
	assert_eq!(schedule(130.0).unwrap().num_fingers, 4);
}

#[test]
fn negative_speed_is_a_no_op() {
	assert!(schedule(-1.0).is_none());
	assert!(schedule(std::f64::NAN).is_none());

	let mut ctrl = SpeedScheduleController::new();
	ctrl.set_path_search_rate(33.0);
	ctrl.apply_speed_category(-0.5);
	assert_eq!(ctrl.path_search_rate(), 33.0);
	assert_eq!(ctrl.tracking_bandwidth(), 120.0);
	assert_eq!(ctrl.reassignment_period(), 1.0);
	assert_eq!(ctrl.recommended_num_fingers(), 4);
}

#[test]
fn speed_updates_drive_parameters_only_in_adaptive_mode() {
	let mut ctrl = SpeedScheduleController::new();

	ctrl.set_gps_speed(5.0);
	assert_eq!(ctrl.gps_speed(), 5.0);
	assert_eq!(ctrl.path_search_rate(), 20.0);

	// Enabling with a valid speed on hand applies the schedule immediately
	ctrl.set_adaptive_mode(true);
	assert_close(ctrl.path_search_rate(), 5.0);
	assert_close(ctrl.tracking_bandwidth(), 50.0);
	assert_close(ctrl.reassignment_period(), 2.0);
	assert_eq!(ctrl.recommended_num_fingers(), 3);

	ctrl.set_gps_speed(90.0);
	assert_close(ctrl.path_search_rate(), 35.0);
	assert_eq!(ctrl.speed_category(), Some(SpeedCategory::VehicleHighSpeed));

	// Negative speeds are stored but don't touch the schedule
	ctrl.set_gps_speed(-1.0);
	assert_eq!(ctrl.gps_speed(), -1.0);
	assert_close(ctrl.path_search_rate(), 35.0);

	ctrl.set_adaptive_mode(false);
	ctrl.set_gps_speed(200.0);
	assert_close(ctrl.path_search_rate(), 35.0);
}

#[test]
fn manual_overrides_hold_until_schedule_fires() {
	let mut ctrl = SpeedScheduleController::new();
	ctrl.set_path_search_rate(50.0);
	ctrl.set_tracking_bandwidth(200.0);
	ctrl.set_path_detection_threshold(0.6);
	ctrl.set_lock_threshold(0.8);
	ctrl.set_reassignment_period(0.5);

	// No valid speed yet, so enabling adaptive mode changes nothing
	ctrl.set_adaptive_mode(true);
	assert_eq!(ctrl.path_search_rate(), 50.0);
	assert_eq!(ctrl.tracking_bandwidth(), 200.0);
	assert_eq!(ctrl.reassignment_period(), 0.5);

	ctrl.set_gps_speed(15.0);
	assert_close(ctrl.path_search_rate(), 10.0);
	assert_close(ctrl.tracking_bandwidth(), 100.0);
	assert_close(ctrl.reassignment_period(), 1.0);

	// Thresholds have no schedule entry
	assert_eq!(ctrl.path_detection_threshold(), 0.6);
	assert_eq!(ctrl.lock_threshold(), 0.8);
}
