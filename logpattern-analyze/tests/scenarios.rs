//! End-to-end worked scenarios from the spec's "concrete scenarios" table,
//! driven through the real Scanner rather than hand-built token sequences.

use logpattern_analyze::Analyzer;
use logpattern_scan::Scanner;
use logpattern_token::{Config, PlaceholderSyntax};

#[test]
fn sshd_failed_password_line_generalizes_host_and_port() {
    let config = Config {
        placeholder_syntax: PlaceholderSyntax::Grok,
        ..Config::default()
    };
    let mut scanner = Scanner::new(config.clone());
    let line = "Jan 12 06:49:42 irc sshd[7034]: Failed password for root from 218.161.81.238 port 4228 ssh2";
    let sequence = scanner.scan(line, false, &[]).unwrap();

    let mut analyzer = Analyzer::new(config);
    analyzer.add(sequence.clone()).unwrap();
    analyzer.finalize();
    let pattern = analyzer.analyze(&sequence).unwrap();

    assert_eq!(
        pattern.rendered(),
        "%{TIMESTAMP:time} irc sshd[%{INT:integer}]: Failed password for root from %{IP:srcip} port %{INT:srcport} ssh2"
    );
}
