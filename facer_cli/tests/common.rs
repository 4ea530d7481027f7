use assert_cmd::Command;

pub fn facer_cmd() -> Command {
	let mut cmd = Command::cargo_bin("facer").expect("facer binary builds");
	cmd.env("NO_COLOR", "1");
	cmd
}
