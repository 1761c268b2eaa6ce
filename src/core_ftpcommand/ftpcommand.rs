use std::str::FromStr;

#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    SYST,
    PWD,
    CWD,
    TYPE,
    MDTM,
    SIZE,
    RETR,
    STOR,
    PASV,
    PORT,
    NLST,
    LIST,
    QUIT,
}

impl FtpCommand {
    /// Commands accepted before the session has logged in.
    pub fn allowed_before_login(self) -> bool {
        matches!(self, FtpCommand::USER | FtpCommand::PASS | FtpCommand::QUIT)
    }
}

impl FromStr for FtpCommand {
    type Err = ();

    fn from_str(cmd: &str) -> Result<Self, Self::Err> {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => Ok(FtpCommand::USER),
            "PASS" => Ok(FtpCommand::PASS),
            "SYST" => Ok(FtpCommand::SYST),
            "PWD" => Ok(FtpCommand::PWD),
            "CWD" => Ok(FtpCommand::CWD),
            "TYPE" => Ok(FtpCommand::TYPE),
            "MDTM" => Ok(FtpCommand::MDTM),
            "SIZE" => Ok(FtpCommand::SIZE),
            "RETR" => Ok(FtpCommand::RETR),
            "STOR" => Ok(FtpCommand::STOR),
            "PASV" => Ok(FtpCommand::PASV),
            "PORT" => Ok(FtpCommand::PORT),
            "NLST" => Ok(FtpCommand::NLST),
            "LIST" => Ok(FtpCommand::LIST),
            "QUIT" => Ok(FtpCommand::QUIT),
            _ => Err(()),
        }
    }
}

/// Splits a command line at its first space into an upper-cased verb and the
/// raw remainder.
pub fn parse_command_line(line: &str) -> (String, &str) {
    let (verb, arg) = line.split_once(' ').unwrap_or((line, ""));
    (verb.to_ascii_uppercase(), arg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbs_are_case_insensitive() {
        assert_eq!("user".parse::<FtpCommand>(), Ok(FtpCommand::USER));
        assert_eq!("Retr".parse::<FtpCommand>(), Ok(FtpCommand::RETR));
        assert_eq!("NLST".parse::<FtpCommand>(), Ok(FtpCommand::NLST));
        assert!("DELE".parse::<FtpCommand>().is_err());
    }

    #[test]
    fn test_parse_command_line() {
        assert_eq!(parse_command_line("retr my file.txt"), ("RETR".to_string(), "my file.txt"));
        assert_eq!(parse_command_line("PASV"), ("PASV".to_string(), ""));
        assert_eq!(parse_command_line("PASS "), ("PASS".to_string(), ""));
        assert_eq!(parse_command_line(""), (String::new(), ""));
    }

    #[test]
    fn test_login_gate() {
        assert!(FtpCommand::USER.allowed_before_login());
        assert!(FtpCommand::PASS.allowed_before_login());
        assert!(FtpCommand::QUIT.allowed_before_login());
        assert!(!FtpCommand::PWD.allowed_before_login());
        assert!(!FtpCommand::PASV.allowed_before_login());
    }
}
