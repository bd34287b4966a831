use crate::encoding;
use crate::listing::RemoteLister;
use crate::photo::Photo;

/// Hard cap on descent, in case the server reports a directory as its own
/// child or otherwise produces a pathologically deep tree.
pub const MAX_WALK_DEPTH: usize = 32;

struct PendingDir {
    path: String,
    is_target: bool,
    depth: usize,
}

/// Walk the remote tree rooted at `root` and append a [`Photo`] for every
/// entry whose decoded name starts with `name_prefix` inside any directory
/// named `target_folder`, wherever that directory occurs in the tree.
///
/// A directory that cannot be listed contributes nothing and the walk
/// continues elsewhere; an entry whose name cannot be decoded is skipped.
/// Result order follows whatever the server returned and is not stable.
pub async fn collect_photos(
    lister: &mut dyn RemoteLister,
    root: &str,
    target_folder: &str,
    name_prefix: &str,
    photos: &mut Vec<Photo>,
) {
    log::info!("Starting photo discovery under {}", root);

    let mut worklist = vec![PendingDir {
        path: root.to_string(),
        is_target: false,
        depth: 0,
    }];

    while let Some(dir) = worklist.pop() {
        let entries = match lister.list(&encoding::repair_path(&dir.path)).await {
            Ok(entries) => entries,
            Err(e) => {
                log::error!("Failed to list directory {}: {}", dir.path, e);
                continue;
            }
        };

        for entry in entries {
            if entry.name == "." || entry.name == ".." {
                continue;
            }

            let name = match encoding::decode_name(&entry.name) {
                Ok(name) => name,
                Err(e) => {
                    log::warn!("Skipping entry with undecodable name in {}: {}", dir.path, e);
                    continue;
                }
            };

            if dir.is_target && name.starts_with(name_prefix) {
                log::debug!("Collecting {} from {}", name, dir.path);
                match Photo::from_entry(&name, &entry, &dir.path) {
                    Ok(photo) => photos.push(photo),
                    Err(e) => {
                        log::warn!("Skipping {} in {}: {}", name, dir.path, e);
                    }
                }
            }

            if entry.is_dir {
                if dir.depth + 1 > MAX_WALK_DEPTH {
                    log::warn!(
                        "Maximum walk depth {} reached, not descending into {}/{}",
                        MAX_WALK_DEPTH,
                        dir.path,
                        name
                    );
                    continue;
                }
                worklist.push(PendingDir {
                    path: join_path(&dir.path, &name),
                    is_target: name == target_folder,
                    depth: dir.depth + 1,
                });
            } else {
                log::trace!("Skipping non-directory entry for recursion: {}", name);
            }
        }
    }

    log::info!("Photo discovery complete, {} photos collected", photos.len());
}

fn join_path(parent: &str, child: &str) -> String {
    if parent.ends_with('/') {
        format!("{}{}", parent, child)
    } else {
        format!("{}/{}", parent, child)
    }
}
