use chrono::{SecondsFormat, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{
    Course, CourseFields, Student, StudentCourseRow, StudentFields, StudentWithCourse,
};

const STUDENT_WITH_COURSE_SELECT: &str = r#"
    SELECT
        s.id,
        s.name,
        s.email,
        s.course_id,
        s.created_at,
        s.updated_at,
        c.name AS course_name,
        c.code AS course_code
    FROM students s
    LEFT JOIN courses c ON c.id = s.course_id
"#;

/// Fixed-width UTC timestamp, so string order matches time order.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub async fn fetch_courses(db: &SqlitePool) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        r#"
        SELECT id, name, code, instructor, credits, created_at, updated_at
        FROM courses
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn find_course_by_id(db: &SqlitePool, id: &str) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "SELECT id, name, code, instructor, credits, created_at, updated_at FROM courses WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

/// True when another course (other than `except_id`) already uses `code`,
/// compared case-insensitively.
pub async fn course_code_taken(
    db: &SqlitePool,
    code: &str,
    except_id: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM courses WHERE code = ?1 COLLATE NOCASE AND (?2 IS NULL OR id != ?2)",
    )
    .bind(code)
    .bind(except_id)
    .fetch_one(db)
    .await?;

    Ok(count > 0)
}

pub async fn insert_course(db: &SqlitePool, fields: CourseFields) -> Result<Course, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = timestamp();

    sqlx::query(
        r#"
        INSERT INTO courses (id, name, code, instructor, credits, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
        "#,
    )
    .bind(&id)
    .bind(&fields.name)
    .bind(&fields.code)
    .bind(&fields.instructor)
    .bind(fields.credits)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Course {
        id,
        name: fields.name,
        code: fields.code,
        instructor: fields.instructor,
        credits: fields.credits,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn update_course(db: &SqlitePool, course: &Course) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE courses
        SET name = ?1,
            code = ?2,
            instructor = ?3,
            credits = ?4,
            updated_at = ?5
        WHERE id = ?6
        "#,
    )
    .bind(&course.name)
    .bind(&course.code)
    .bind(&course.instructor)
    .bind(course.credits)
    .bind(&course.updated_at)
    .bind(&course.id)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

/// Deletes a course together with every student enrolled in it, in one
/// transaction. Returns the number of students removed, or `None` if the
/// course did not exist.
pub async fn delete_course_cascade(db: &SqlitePool, id: &str) -> Result<Option<u64>, sqlx::Error> {
    let mut tx = db.begin().await?;

    let students_removed = sqlx::query("DELETE FROM students WHERE course_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let courses_removed = sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if courses_removed == 0 {
        tx.rollback().await?;
        return Ok(None);
    }

    tx.commit().await?;
    Ok(Some(students_removed))
}

pub async fn fetch_students(db: &SqlitePool) -> Result<Vec<StudentWithCourse>, sqlx::Error> {
    let sql = format!(
        "{} ORDER BY s.created_at DESC, s.rowid DESC",
        STUDENT_WITH_COURSE_SELECT
    );
    let rows = sqlx::query_as::<_, StudentCourseRow>(&sql)
        .fetch_all(db)
        .await?;

    Ok(rows.into_iter().map(StudentWithCourse::from).collect())
}

pub async fn find_student_by_id(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<StudentWithCourse>, sqlx::Error> {
    let sql = format!("{} WHERE s.id = ?", STUDENT_WITH_COURSE_SELECT);
    let row = sqlx::query_as::<_, StudentCourseRow>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;

    Ok(row.map(StudentWithCourse::from))
}

pub async fn student_email_taken(
    db: &SqlitePool,
    email: &str,
    except_id: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM students WHERE email = ?1 COLLATE NOCASE AND (?2 IS NULL OR id != ?2)",
    )
    .bind(email)
    .bind(except_id)
    .fetch_one(db)
    .await?;

    Ok(count > 0)
}

pub async fn insert_student(
    db: &SqlitePool,
    fields: StudentFields,
) -> Result<Student, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = timestamp();

    sqlx::query(
        r#"
        INSERT INTO students (id, name, email, course_id, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        "#,
    )
    .bind(&id)
    .bind(&fields.name)
    .bind(&fields.email)
    .bind(&fields.course_id)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Student {
        id,
        name: fields.name,
        email: fields.email,
        course_id: fields.course_id,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn update_student(db: &SqlitePool, student: &Student) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE students
        SET name = ?1,
            email = ?2,
            course_id = ?3,
            updated_at = ?4
        WHERE id = ?5
        "#,
    )
    .bind(&student.name)
    .bind(&student.email)
    .bind(&student.course_id)
    .bind(&student.updated_at)
    .bind(&student.id)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

pub async fn delete_student(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM students WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
