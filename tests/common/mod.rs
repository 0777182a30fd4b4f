#![allow(dead_code)]

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

pub const MIT_C_HEADER: &str = concat!(
  "/*\n",
  " * Copyright (c) 2018-2020 Example Corp.\n",
  " *\n",
  " * Permission is hereby granted, free of charge, to any person obtaining a copy\n",
  " * of this software and associated documentation files (the \"Software\"), to deal\n",
  " * in the Software without restriction, including without limitation the rights\n",
  " * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell\n",
  " * copies of the Software, and to permit persons to whom the Software is\n",
  " * furnished to do so, subject to the following conditions:\n",
  " *\n",
  " * The above copyright notice and this permission notice shall be included in\n",
  " * all copies or substantial portions of the Software.\n",
  " *\n",
  " * THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR\n",
  " * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,\n",
  " * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE\n",
  " * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER\n",
  " * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,\n",
  " * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE\n",
  " * SOFTWARE.\n",
  " */\n",
);

pub const MPL_HASH_HEADER: &str = concat!(
  "# This Source Code Form is subject to the terms of the Mozilla Public\n",
  "# License, v. 2.0. If a copy of the MPL was not distributed with this\n",
  "# file, You can obtain one at http://mozilla.org/MPL/2.0/.\n",
);

/// Writes `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> Result<()> {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Lays out a small source tree:
/// - `src/main.c`: MIT, Example Corp 2018-2020
/// - `src/util.c`: MIT, Example Corp 2021
/// - `scripts/build.py`: MPL-2.0 after a shebang
/// - `src/plain.rs`: no license
/// - `docs/notes.xyz`: unsupported
pub fn setup_tree(root: &Path) -> Result<()> {
  write_file(root, "src/main.c", &format!("{MIT_C_HEADER}\nint main(void) {{ return 0; }}\n"))?;
  write_file(
    root,
    "src/util.c",
    &format!(
      "{}\nint util(void) {{ return 1; }}\n",
      MIT_C_HEADER.replace("2018-2020", "2021")
    ),
  )?;
  write_file(
    root,
    "scripts/build.py",
    &format!("#!/usr/bin/env python3\n\n{MPL_HASH_HEADER}\nprint('build')\n"),
  )?;
  write_file(root, "src/plain.rs", "fn main() {}\n")?;
  write_file(root, "docs/notes.xyz", "nothing to see\n")?;
  Ok(())
}
