use std::{fs, io};
use std::path::PathBuf;

/// Extension of post files inside a repository folder.
pub const POST_FILE_EXTENSION: &str = "mdtxt";

pub struct PostList {
    pub root_dir: PathBuf,
    pub extension: String,
}

impl PostList {
    pub fn new(root_dir: PathBuf) -> PostList {
        PostList {
            root_dir,
            extension: POST_FILE_EXTENSION.to_string(),
        }
    }

    /// Regular files directly inside the root dir carrying the post extension,
    /// sorted by file name. Failing to read the root dir is an error, entries that
    /// cannot be inspected are ignored.
    pub fn retrieve_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut posts = vec![];
        let suffix = format!(".{}", self.extension);

        for entry in fs::read_dir(self.root_dir.as_path())? {
            let Ok(entry) = entry else { continue };
            let Ok(file_type) = entry.file_type() else { continue };
            if !file_type.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            if let Some(file_name) = file_name.to_str() {
                if file_name.ends_with(&suffix) {
                    posts.push(entry.path());
                }
            }
        }

        posts.sort();
        Ok(posts)
    }
}
