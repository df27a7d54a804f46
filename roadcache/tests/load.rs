#![cfg(feature = "cli")]

use assert_fs::{TempDir, prelude::*};
use predicates::{path, str};
use test_utilities::*;

#[test]
fn remote_hit_populates_local_cache() -> Result<(), Box<dyn std::error::Error>> {
	let dir = TempDir::new()?;
	seed_shared_store(&dir);
	let config = write_config(
		&dir,
		"location: Piedmont, California, USA\nremote_namespace: file://shared\n",
	);

	roadcache_cmd()
		.args(["load", config.to_str().unwrap()])
		.assert()
		.success()
		.stdout(str::diff(
			"Loaded graph for 'Piedmont, California, USA' from remote store: 3 nodes, 3 edges\n",
		));
	dir
		.child("map_cache/Piedmont__California__USA_drive.graphml")
		.assert(path::exists());

	// the second run never needs the remote store
	std::fs::remove_dir_all(dir.path().join("shared"))?;
	roadcache_cmd()
		.args(["load", config.to_str().unwrap()])
		.assert()
		.success()
		.stdout(str::diff(
			"Loaded graph for 'Piedmont, California, USA' from local cache: 3 nodes, 3 edges\n",
		));
	Ok(())
}

#[test]
fn local_hit_without_remote() -> Result<(), Box<dyn std::error::Error>> {
	let dir = TempDir::new()?;
	dir
		.child("graphs/Piedmont__California__USA_drive.graphml")
		.write_file(&get_testdata("shared/graphs/Piedmont__California__USA_drive.graphml"))?;
	let config = write_config(&dir, "location: Piedmont, California, USA\ncache_dir: graphs\n");

	roadcache_cmd()
		.args(["load", config.to_str().unwrap()])
		.assert()
		.success()
		.stdout(str::contains("from local cache: 3 nodes, 3 edges"));
	Ok(())
}

#[test]
fn unreachable_origin_is_unavailable() -> Result<(), Box<dyn std::error::Error>> {
	let dir = TempDir::new()?;
	let config = write_config(&dir, "location: Atlantis\nremote_namespace: file://shared\n");

	roadcache_cmd()
		.args(["load", config.to_str().unwrap()])
		.assert()
		.failure()
		.stdout(str::is_empty())
		.stderr(str::contains("origin stage: graph unavailable"))
		.stderr(str::contains("origin failed to generate 'Atlantis' (drive)"));
	dir.child("map_cache/Atlantis_drive.graphml").assert(path::missing());
	dir.child("shared").assert(path::missing());
	Ok(())
}

#[test]
fn missing_location_fails_before_any_tier() -> Result<(), Box<dyn std::error::Error>> {
	let dir = TempDir::new()?;
	let config = write_config(&dir, "network_type: drive\n");

	roadcache_cmd()
		.args(["load", config.to_str().unwrap()])
		.assert()
		.failure()
		.stderr(str::contains("config stage: invalid configuration"))
		.stderr(str::contains("missing field `location`"));
	dir.child("map_cache").assert(path::missing());
	Ok(())
}

#[test]
fn list_shows_both_tiers() -> Result<(), Box<dyn std::error::Error>> {
	let dir = TempDir::new()?;
	seed_shared_store(&dir);
	let config = write_config(
		&dir,
		"location: Piedmont, California, USA\nremote_namespace: file://shared\n",
	);

	roadcache_cmd()
		.args(["list", config.to_str().unwrap()])
		.assert()
		.success()
		.stdout(str::contains("  (empty)"))
		.stdout(str::contains("remote store file://"))
		.stdout(str::contains("  Piedmont__California__USA_drive.graphml"));
	Ok(())
}
