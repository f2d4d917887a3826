//! Fixed two-level process tree
//!
//! ```text
//! P1
//! ├── F1
//! │   ├── N1: ls
//! │   └── N2: pwd
//! └── F2
//!     ├── N3: date
//!     └── N4: whoami
//! ```
//!
//! P1 creates F1 and F2 by re-executing the current binary in branch mode.
//! Each branch starts its two leaf commands through `/bin/sh -c`, waits for
//! both, and prints its identity. P1 waits for both branches last.
//!
//! Failure to create any process is fatal for the process that tried. A leaf
//! command that runs but exits non-zero is only logged.

use crate::Result;
use anyhow::Context;
use log::{debug, warn};
use std::fmt;
use std::os::unix::process::parent_id;
use std::path::Path;
use std::process::{self, Child, Command, ExitStatus};

/// Shell used to run leaf commands
pub const SHELL: &str = "/bin/sh";

/// First-level node of the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchId {
    F1,
    F2,
}

impl BranchId {
    /// Lowercase name, as passed to `--branch`
    pub fn as_str(self) -> &'static str {
        match self {
            BranchId::F1 => "f1",
            BranchId::F2 => "f2",
        }
    }

    pub fn branch(self) -> &'static Branch {
        match self {
            BranchId::F1 => &TREE[0],
            BranchId::F2 => &TREE[1],
        }
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchId::F1 => write!(f, "F1"),
            BranchId::F2 => write!(f, "F2"),
        }
    }
}

/// Second-level node: a named shell command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaf {
    pub name: &'static str,
    pub command: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Branch {
    pub id: BranchId,
    pub leaves: [Leaf; 2],
}

/// The whole tree below P1
pub const TREE: [Branch; 2] = [
    Branch {
        id: BranchId::F1,
        leaves: [
            Leaf { name: "N1", command: "ls" },
            Leaf { name: "N2", command: "pwd" },
        ],
    },
    Branch {
        id: BranchId::F2,
        leaves: [
            Leaf { name: "N3", command: "date" },
            Leaf { name: "N4", command: "whoami" },
        ],
    },
];

/// Wait for already started children before bailing out
fn reap<T: fmt::Display>(children: Vec<(T, Child)>) {
    for (name, mut child) in children {
        if let Err(e) = child.wait() {
            warn!("failed to wait for {}: {}", name, e);
        }
    }
}

/// Run P1
///
/// `program` is the binary to re-execute for each branch, normally
/// `std::env::current_exe()`.
pub fn run_root(program: &Path, debug: bool) -> Result<()> {
    let pid = process::id();
    println!("=== Starting process tree ===");
    println!("[P1] parent process started. PID: {}", pid);
    println!();

    let mut children: Vec<(BranchId, Child)> = Vec::with_capacity(TREE.len());
    for branch in &TREE {
        let mut cmd = Command::new(program);
        cmd.arg("--mode").arg("branch");
        cmd.arg("--branch").arg(branch.id.as_str());
        if debug {
            cmd.arg("--debug");
        }

        match cmd.spawn() {
            Ok(child) => {
                debug!("created {} (pid {})", branch.id, child.id());
                children.push((branch.id, child));
            }
            Err(e) => {
                reap(children);
                return Err(e).with_context(|| format!("failed to create process {}", branch.id));
            }
        }
    }

    let mut failure = None;
    for (id, mut child) in children {
        let status = child
            .wait()
            .with_context(|| format!("failed to wait for process {}", id))?;
        debug!("{} exited with {}", id, status);
        if !status.success() && failure.is_none() {
            failure = Some((id, status));
        }
    }

    if let Some((id, status)) = failure {
        anyhow::bail!("process {} exited with {}", id, status);
    }

    println!();
    println!("========================================");
    println!("[P1] process P1.");
    println!("[P1] PID: {}", pid);
    println!("========================================");
    println!("[P1] child and grandchild processes finished");

    Ok(())
}

/// Run one branch (F1 or F2)
pub fn run_branch(id: BranchId) -> Result<()> {
    let branch = id.branch();
    let statuses = run_leaves(&branch.leaves)?;

    for (leaf, status) in branch.leaves.iter().zip(&statuses) {
        if !status.success() {
            warn!("[{}] `{}` exited with {}", leaf.name, leaf.command, status);
        }
    }

    println!();
    println!("[{}] process {}.", id, id);
    println!("[{}] PID: {}", id, process::id());
    println!("[{}] parent PID (P1): {}", id, parent_id());

    Ok(())
}

/// Start every leaf command, then wait for all of them
///
/// Returns the exit statuses in leaf order.
pub fn run_leaves(leaves: &[Leaf]) -> Result<Vec<ExitStatus>> {
    let mut children: Vec<(&str, Child)> = Vec::with_capacity(leaves.len());

    for leaf in leaves {
        println!("[{}] running command: {}", leaf.name, leaf.command);

        match Command::new(SHELL).arg("-c").arg(leaf.command).spawn() {
            Ok(child) => {
                debug!("created {} (pid {})", leaf.name, child.id());
                children.push((leaf.name, child));
            }
            Err(e) => {
                reap(children);
                return Err(e).with_context(|| format!("failed to create process {}", leaf.name));
            }
        }
    }

    children
        .into_iter()
        .map(|(name, mut child)| {
            child
                .wait()
                .with_context(|| format!("failed to wait for process {}", name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_layout() {
        let names: Vec<_> = TREE.iter().flat_map(|b| b.leaves.iter().map(|l| l.name)).collect();
        assert_eq!(names, ["N1", "N2", "N3", "N4"]);

        let commands: Vec<_> = TREE.iter().flat_map(|b| b.leaves.iter().map(|l| l.command)).collect();
        assert_eq!(commands, ["ls", "pwd", "date", "whoami"]);
    }

    #[test]
    fn test_branch_lookup() {
        assert_eq!(BranchId::F1.branch().id, BranchId::F1);
        assert_eq!(BranchId::F2.branch().id, BranchId::F2);
        assert_eq!(BranchId::F2.to_string(), "F2");
        assert_eq!(BranchId::F2.as_str(), "f2");
    }

    #[test]
    fn test_run_leaves_statuses() {
        let leaves = [
            Leaf { name: "T1", command: "true" },
            Leaf { name: "T2", command: "exit 3" },
        ];

        let statuses = run_leaves(&leaves).unwrap();
        assert_eq!(statuses.len(), 2);
        assert!(statuses[0].success());
        assert_eq!(statuses[1].code(), Some(3));
    }

    #[test]
    fn test_run_root_missing_program() {
        let err = run_root(Path::new("/nonexistent/procbench"), false).unwrap_err();
        assert!(err.to_string().contains("failed to create process F1"));
    }
}
