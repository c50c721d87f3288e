use super::*;

#[test]
fn test_write_env_renders_key_value_lines() -> io::Result<()> {
    let fixture = TempDirFixture::new()?;
    let path = fixture.write_env(
        ".env",
        &[("KEYSTONE_LOG_LEVEL", "2"), ("KEYSTONE_COMPONENTS", "a,b")],
    )?;

    assert!(path.is_file());
    assert_eq!(
        fixture.read_file(".env")?,
        "KEYSTONE_LOG_LEVEL=2\nKEYSTONE_COMPONENTS=a,b\n"
    );
    Ok(())
}

#[test]
fn test_write_file_creates_parents() -> io::Result<()> {
    let fixture = TempDirFixture::new()?;
    fixture.write_file("conf/nested/.env.local", "KEYSTONE_COLOR=true\n")?;
    assert!(fixture.file_exists("conf/nested/.env.local"));
    assert!(!fixture.file_exists("conf/.env"));
    Ok(())
}

#[test]
fn test_fixtures_are_isolated() -> io::Result<()> {
    let first = TempDirFixture::new()?;
    let second = TempDirFixture::new()?;
    assert_ne!(first.path(), second.path());

    first.write_file(".env", "A=1\n")?;
    assert!(!second.file_exists(".env"));
    Ok(())
}
