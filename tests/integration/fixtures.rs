//! Запросы по учебной схеме Student / Course / SC

use stepql::StatementKind;

/// Корректные запросы всех видов
pub const VALID: &[(&str, StatementKind)] = &[
    (
        "SELECT Sno, Sname FROM Student WHERE Sdept = 'CS' AND Sage <= 20",
        StatementKind::Select,
    ),
    (
        "SELECT * FROM Student, SC WHERE Sno = SCno",
        StatementKind::Select,
    ),
    (
        "SELECT Sname FROM Student WHERE Sage NOT BETWEEN 20 AND 23 ORDER BY Sname DESC",
        StatementKind::Select,
    ),
    (
        "INSERT INTO Student (Sno, Sname, Ssex, Sage, Sdept) VALUES ('201215128', 'Chen', 'M', 18, 'IS')",
        StatementKind::Insert,
    ),
    (
        "UPDATE Student SET Sage = 22 WHERE Sno = '201215121'",
        StatementKind::Update,
    ),
    (
        "DELETE FROM SC WHERE Sno IN ('201215121', '201215122') OR Grade < 60",
        StatementKind::Delete,
    ),
    (
        "CREATE TABLE Course (
            Cno CHAR(4) PRIMARY KEY,
            Cname CHAR(40) NOT NULL UNIQUE,
            Cpno CHAR(4),
            Ccredit SMALLINT CHECK (Ccredit > 0),
            FOREIGN KEY (Cpno) REFERENCES Course(Cno)
        )",
        StatementKind::CreateTable,
    ),
    (
        "CREATE VIEW CS_Student AS SELECT Sno, Sname FROM Student WHERE Sdept = 'CS'",
        StatementKind::CreateView,
    ),
    (
        "CREATE INDEX Stusno ON Student (Sno ASC, Sdept DESC)",
        StatementKind::CreateIndex,
    ),
    (
        "CREATE USER U1 IDENTIFIED BY 'pa55word'",
        StatementKind::CreateUser,
    ),
    (
        "GRANT SELECT, INSERT ON TABLE Student TO U1, U2",
        StatementKind::Grant,
    ),
    (
        "REVOKE UPDATE (Sno) ON TABLE Student FROM U4",
        StatementKind::Revoke,
    ),
];
