#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::error::Error;
use crate::tree::{apply, decode, CommandTree};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

const MODULE: &str = "github.com/acme/awsexample";

/// aws ─┬─ s3 ── ls(+bucket, --page-size)
///      └─ ec2(-region)
fn sample_tree() -> CommandTree {
    let mut tree = CommandTree::new("aws").unwrap();
    apply(&mut tree, &["s3", "ls"], &["+bucket", "--page-size"]).unwrap();
    apply(&mut tree, &["ec2"], &["-region"]).unwrap();
    tree
}

fn tree_from_yaml(yaml: &str) -> CommandTree {
    decode(&serde_yaml::from_str(yaml).unwrap()).unwrap()
}

fn file<'a>(layout: &'a FolderPlan, path: &str) -> &'a FilePlan {
    layout
        .files()
        .into_iter()
        .find(|f| f.path == Path::new(path))
        .unwrap_or_else(|| panic!("no file planned at {path}"))
}

fn rendered(tree: &CommandTree, layout: &FolderPlan, path: &str) -> String {
    render_command(tree, file(layout, path)).unwrap()
}

#[derive(Default)]
struct RecordingFormatter {
    calls: RefCell<Vec<PathBuf>>,
    unavailable: bool,
}

impl SourceFormatter for RecordingFormatter {
    fn ensure_available(&self) -> crate::Result<()> {
        if self.unavailable {
            return Err(Error::MissingTool {
                tool: "gofmt".to_string(),
            });
        }
        Ok(())
    }

    fn format(&self, dir: &Path) -> crate::Result<()> {
        self.calls.borrow_mut().push(dir.to_path_buf());
        Ok(())
    }
}

fn options(root: &Path) -> GenerateOptions {
    GenerateOptions {
        project_root: root.to_path_buf(),
        output_dir: PathBuf::from("cmd"),
        entry_dir: PathBuf::from("examples/cobra-gen"),
        module: MODULE.to_string(),
        dry_run: false,
    }
}

#[test]
fn test_layout_shape() {
    let tree = sample_tree();
    let layout = plan(&tree, "cmd", MODULE).unwrap().unwrap();

    assert_eq!(layout.name, "cmd");
    let paths: Vec<&Path> = layout.files().into_iter().map(|f| f.path.as_path()).collect();
    assert_eq!(
        paths,
        vec![
            Path::new("cmd/aws.go"),
            Path::new("cmd/ec2.go"),
            Path::new("cmd/s3/s3.go"),
            Path::new("cmd/s3/ls.go"),
        ]
    );
    assert_eq!(
        layout.folders(),
        vec![&PathBuf::from("cmd"), &PathBuf::from("cmd/s3")]
    );
}

#[test]
fn test_layout_file_metadata() {
    let tree = sample_tree();
    let layout = plan(&tree, "cmd", MODULE).unwrap().unwrap();

    let root = layout.root_file().unwrap();
    assert_eq!(root.file_name, "aws.go");
    assert_eq!(root.package_name, "cmd");
    assert_eq!(root.parent_package, None);
    assert!(!root.shares_parent_package);
    assert_eq!(root.root_module, MODULE);

    let s3 = file(&layout, "cmd/s3/s3.go");
    assert_eq!(s3.package_name, "s3");
    assert_eq!(s3.package_path, "cmd/s3");
    assert_eq!(s3.parent_package.as_deref(), Some("aws"));
    assert!(!s3.shares_parent_package);

    let ls = file(&layout, "cmd/s3/ls.go");
    assert_eq!(ls.package_name, "s3");
    assert_eq!(ls.parent_package.as_deref(), Some("s3"));
    assert!(ls.shares_parent_package);

    let ec2 = file(&layout, "cmd/ec2.go");
    assert_eq!(ec2.package_name, "cmd");
    assert!(ec2.shares_parent_package);
}

#[test]
fn test_layout_subcommand_registrations() {
    let tree = sample_tree();
    let layout = plan(&tree, "cmd", MODULE).unwrap().unwrap();

    let root = layout.root_file().unwrap();
    assert_eq!(
        root.subcommands,
        vec![
            Subcommand {
                identifier: "S3".to_string(),
                package: Some(ImportedPackage {
                    name: "s3".to_string(),
                    import_path: format!("{MODULE}/cmd/s3"),
                }),
            },
            Subcommand {
                identifier: "Ec2".to_string(),
                package: None,
            },
        ]
    );
    assert_eq!(
        file(&layout, "cmd/s3/s3.go").subcommands,
        vec![Subcommand {
            identifier: "Ls".to_string(),
            package: None,
        }]
    );
    assert!(file(&layout, "cmd/s3/ls.go").subcommands.is_empty());
}

#[test]
fn test_layout_nested_root_folder() {
    let tree = sample_tree();
    let layout = plan(&tree, "internal/cli", MODULE).unwrap().unwrap();
    assert_eq!(layout.name, "cli");
    assert_eq!(
        layout.root_file().unwrap().subcommands[0]
            .package
            .as_ref()
            .unwrap()
            .import_path,
        format!("{MODULE}/internal/cli/s3")
    );
    assert!(file(&layout, "internal/cli/s3/ls.go").shares_parent_package);
}

#[test]
fn test_layout_empty_tree() {
    let tree = CommandTree::new("aws").unwrap();
    assert!(plan(&tree, "cmd", MODULE).unwrap().is_none());
}

#[test]
fn test_layout_rejects_package_clash() {
    let tree = tree_from_yaml("tool:\n  - foo-bar:\n      - x\n  - foobar:\n      - y\n");
    assert!(matches!(
        plan(&tree, "cmd", MODULE).unwrap_err(),
        Error::InvalidName { .. }
    ));
}

#[test]
fn test_layout_rejects_file_clash_with_root() {
    let tree = tree_from_yaml("tool:\n  - tool\n");
    assert!(matches!(
        plan(&tree, "cmd", MODULE).unwrap_err(),
        Error::InvalidName { .. }
    ));
}

#[test]
fn test_layout_rejects_shared_package_variable() {
    let tree = tree_from_yaml("tool:\n  - get-flag:\n      - --id\n  - get:\n      - --flag-id\n");
    assert!(matches!(
        plan(&tree, "cmd", MODULE).unwrap_err(),
        Error::InvalidName { .. }
    ));
}

#[test]
fn test_layout_rejects_package_shadowing_import() {
    let tree = tree_from_yaml("tool:\n  - cobra:\n      - x\n");
    assert!(matches!(
        plan(&tree, "cmd", MODULE).unwrap_err(),
        Error::InvalidName { .. }
    ));
}

#[test]
fn test_render_root_command() {
    let tree = sample_tree();
    let layout = plan(&tree, "cmd", MODULE).unwrap().unwrap();
    let out = rendered(&tree, &layout, "cmd/aws.go");

    assert!(out.starts_with("package cmd\n"));
    assert!(out.contains("\"github.com/spf13/cobra\""));
    assert!(out.contains(&format!("\"{MODULE}/cmd/s3\"")));
    assert!(!out.contains("\"fmt\""));
    assert!(out.contains("var AwsCmd = &cobra.Command{"));
    assert!(out.contains("Use:   \"aws\","));
    assert!(!out.contains("ExactArgs"));
    assert!(out.contains("AwsCmd.AddCommand(s3.S3Cmd)"));
    assert!(out.contains("AwsCmd.AddCommand(Ec2Cmd)"));
}

#[test]
fn test_render_leaf_with_args_and_flags() {
    let tree = sample_tree();
    let layout = plan(&tree, "cmd", MODULE).unwrap().unwrap();
    let out = rendered(&tree, &layout, "cmd/s3/ls.go");

    assert!(out.starts_with("package s3\n"));
    assert!(out.contains("\"fmt\""));
    assert!(out.contains("Use:   \"ls [bucket]\","));
    assert!(out.contains("Short: \"aws s3 ls\","));
    assert!(out.contains("Args:  cobra.ExactArgs(1),"));
    assert!(out.contains("bucket := args[0]"));
    assert!(out.contains("fmt.Printf(\"bucket: %v\\n\", bucket)"));
    assert!(out.contains("var LsFlagPageSize string"));
    assert!(out.contains(
        "LsCmd.Flags().StringVarP(&LsFlagPageSize, \"page-size\", \"\", \"\", \"page-size\")"
    ));
    assert!(!out.contains("AddCommand"));
}

#[test]
fn test_render_persistent_flags_on_parent() {
    let mut tree = sample_tree();
    apply(&mut tree, &["s3"], &["--profile"]).unwrap();
    let layout = plan(&tree, "cmd", MODULE).unwrap().unwrap();
    let out = rendered(&tree, &layout, "cmd/s3/s3.go");

    assert!(out.contains("var S3FlagProfile string"));
    assert!(out.contains("S3Cmd.PersistentFlags().StringVarP(&S3FlagProfile, \"profile\""));
    assert!(out.contains("S3Cmd.AddCommand(LsCmd)"));
    assert!(!out.contains(&format!("\"{MODULE}")));
}

#[test]
fn test_render_sibling_flag_variables_are_distinct() {
    let mut tree = CommandTree::new("api").unwrap();
    apply(&mut tree, &["get"], &["--user-id"]).unwrap();
    apply(&mut tree, &["get-user"], &["--id"]).unwrap();
    let layout = plan(&tree, "cmd", MODULE).unwrap().unwrap();

    let get = rendered(&tree, &layout, "cmd/get.go");
    let get_user = rendered(&tree, &layout, "cmd/get-user.go");
    assert!(get.contains("var GetFlagUserId string"));
    assert!(get_user.contains("var GetUserFlagId string"));
    assert!(!get_user.contains("GetFlagUserId"));
}

#[test]
fn test_render_flag_named_cmd() {
    let mut tree = CommandTree::new("aws").unwrap();
    apply(&mut tree, &["ls"], &["--cmd"]).unwrap();
    let layout = plan(&tree, "cmd", MODULE).unwrap().unwrap();
    let out = rendered(&tree, &layout, "cmd/ls.go");

    assert!(out.contains("var LsCmd = &cobra.Command{"));
    assert!(out.contains("var LsFlagCmd string"));
    assert!(out.contains("LsCmd.Flags().StringVarP(&LsFlagCmd, \"cmd\""));
    assert_eq!(out.matches("var LsCmd ").count(), 1);
}

#[test]
fn test_render_reserved_arg_name() {
    let mut tree = sample_tree();
    apply(&mut tree, &["ec2", "run"], &["+type", "+instance-id"]).unwrap();
    let layout = plan(&tree, "cmd", MODULE).unwrap().unwrap();
    let out = rendered(&tree, &layout, "cmd/ec2/run.go");

    assert!(out.contains("typeArg := args[0]"));
    assert!(out.contains("instanceId := args[1]"));
    assert!(out.contains("Args:  cobra.ExactArgs(2),"));
    assert!(out.contains("Use:   \"run [type] [instance-id]\","));
}

#[test]
fn test_render_entry() {
    let tree = sample_tree();
    let layout = plan(&tree, "cmd", MODULE).unwrap().unwrap();
    let out = render_entry(&tree, &layout).unwrap();

    assert!(out.starts_with("package main\n"));
    assert!(out.contains(&format!("\"{MODULE}/cmd\"")));
    assert!(out.contains("cmd.AwsCmd.Execute()"));
}

#[test]
fn test_generate_project_writes_layout() {
    let dir = tempfile::tempdir().unwrap();
    let formatter = RecordingFormatter::default();
    let project = generate_project(&sample_tree(), &options(dir.path()), &formatter)
        .unwrap()
        .unwrap();

    for path in ["cmd/aws.go", "cmd/ec2.go", "cmd/s3/s3.go", "cmd/s3/ls.go"] {
        assert!(dir.path().join(path).is_file(), "missing {path}");
    }
    let entry = dir.path().join("examples/cobra-gen").join(ENTRY_FILE);
    assert_eq!(project.entry_file.as_ref(), Some(&entry));
    assert!(fs::read_to_string(&entry).unwrap().contains("cmd.AwsCmd.Execute()"));
    assert_eq!(project.files.len(), 4);
    assert_eq!(
        *formatter.calls.borrow(),
        vec![dir.path().join("cmd"), dir.path().join("examples/cobra-gen")]
    );
}

#[test]
fn test_generate_refuses_existing_output() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("cmd")).unwrap();
    fs::write(dir.path().join("cmd/keep.go"), "package cmd\n").unwrap();
    let formatter = RecordingFormatter::default();

    let err = generate_project(&sample_tree(), &options(dir.path()), &formatter).unwrap_err();
    assert!(matches!(err, Error::TargetExists(path) if path == dir.path().join("cmd")));
    assert_eq!(
        fs::read_to_string(dir.path().join("cmd/keep.go")).unwrap(),
        "package cmd\n"
    );
    assert!(!dir.path().join("cmd/aws.go").exists());
    assert!(!dir.path().join("examples").exists());
    assert!(formatter.calls.borrow().is_empty());
}

#[test]
fn test_generate_missing_formatter_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let formatter = RecordingFormatter {
        unavailable: true,
        ..Default::default()
    };
    let err = generate_project(&sample_tree(), &options(dir.path()), &formatter).unwrap_err();
    assert!(matches!(err, Error::MissingTool { .. }));
    assert!(!dir.path().join("cmd").exists());
}

#[test]
fn test_generate_dry_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = options(dir.path());
    opts.dry_run = true;
    let formatter = RecordingFormatter::default();
    let project = generate_project(&sample_tree(), &opts, &formatter)
        .unwrap()
        .unwrap();

    assert_eq!(project.files[0], dir.path().join("cmd/aws.go"));
    assert!(!dir.path().join("cmd").exists());
    assert!(formatter.calls.borrow().is_empty());
}

#[test]
fn test_generate_empty_tree() {
    let dir = tempfile::tempdir().unwrap();
    let tree = CommandTree::new("aws").unwrap();
    let formatter = RecordingFormatter::default();
    assert!(generate_project(&tree, &options(dir.path()), &formatter)
        .unwrap()
        .is_none());
    assert!(!dir.path().join("cmd").exists());
}

#[test]
fn test_generate_keeps_existing_entry_file() {
    let dir = tempfile::tempdir().unwrap();
    let entry_dir = dir.path().join("examples/cobra-gen");
    fs::create_dir_all(&entry_dir).unwrap();
    fs::write(entry_dir.join(ENTRY_FILE), "package main // custom\n").unwrap();
    let formatter = RecordingFormatter::default();

    let project = generate_project(&sample_tree(), &options(dir.path()), &formatter)
        .unwrap()
        .unwrap();
    assert!(project.entry_file.is_none());
    assert_eq!(
        fs::read_to_string(entry_dir.join(ENTRY_FILE)).unwrap(),
        "package main // custom\n"
    );
    assert_eq!(*formatter.calls.borrow(), vec![dir.path().join("cmd")]);
}
