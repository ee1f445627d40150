/// Files or directories whose presence marks a directory as the project root.
pub const PROJECT_ROOT_MARKERS: &[&str] = &["Cargo.toml", ".git"];

/// Determine the project root, starting the search at the current working directory.
///
/// See [find_project_root] for how the root is chosen.
pub fn project_root() -> Result<std::path::PathBuf, crate::Error>
{
	let current_dir = std::env::current_dir().map_err(crate::Error::DetermineProjectRoot)?;

	Ok(find_project_root(&current_dir))
}

/// Find the nearest directory, starting with `start` itself and then walking up its ancestors,
/// that contains one of the [PROJECT_ROOT_MARKERS]. If there is none, `start` is returned.
pub fn find_project_root(start: &std::path::Path) -> std::path::PathBuf
{
	let project_root = start.ancestors()
		.find(|directory| PROJECT_ROOT_MARKERS.iter().any(|marker| directory.join(marker).exists()))
		.unwrap_or(start);

	log::debug!("using project root {}", project_root.display());

	project_root.to_path_buf()
}
