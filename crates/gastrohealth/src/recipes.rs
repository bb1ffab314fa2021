//! The seed recipe library shown before the user asks for anything custom.

use crate::model::{Recipe, RecipeCategory};

fn recipe(
    title: &str,
    description: &str,
    category: RecipeCategory,
    cook_time: &str,
    ingredients: &[&str],
    instructions: &str,
) -> Recipe {
    Recipe {
        title: title.to_string(),
        description: description.to_string(),
        category,
        cook_time: cook_time.to_string(),
        ingredients: ingredients.iter().map(|i| (*i).to_string()).collect(),
        instructions: instructions.to_string(),
    }
}

/// All seed recipes, in display order.
#[must_use]
pub fn library() -> Vec<Recipe> {
    vec![
        recipe(
            "Súp Gà Hầm Gừng Cà Rốt",
            "Một món súp nhẹ nhàng, dễ tiêu hóa, giúp làm ấm bụng và cung cấp dinh dưỡng.",
            RecipeCategory::PainRelief,
            "45 phút",
            &["Ức gà", "Cà rốt", "Gừng", "Hành lá", "Muối, tiêu"],
            "1. Rửa sạch ức gà, luộc sơ và xé nhỏ. 2. Cà rốt, gừng gọt vỏ, thái nhỏ. \
             3. Cho gà, cà rốt, gừng vào nồi hầm với nước dùng trong 30 phút. \
             4. Nêm gia vị vừa ăn, thêm hành lá và dùng nóng.",
        ),
        recipe(
            "Cháo Yến Mạch Chuối",
            "Bữa sáng giàu chất xơ hòa tan, giúp bao bọc niêm mạc dạ dày và giảm acid.",
            RecipeCategory::AntiHeartburn,
            "10 phút",
            &[
                "Yến mạch cán dẹt",
                "Chuối chín",
                "Sữa hạnh nhân (hoặc nước)",
                "Hạt chia",
            ],
            "1. Cho yến mạch và sữa/nước vào nồi, đun sôi nhỏ lửa 5 phút. \
             2. Trong khi đó, nghiền nát chuối. \
             3. Cho chuối và hạt chia vào cháo, khuấy đều và nấu thêm 2 phút. Dùng ấm.",
        ),
        recipe(
            "Cá Hồi Áp Chảo Măng Tây",
            "Cung cấp Omega-3 tốt cho việc phục hồi và măng tây chứa nhiều vitamin.",
            RecipeCategory::Recovery,
            "20 phút",
            &["Phi lê cá hồi", "Măng tây", "Dầu ô liu", "Chanh", "Muối, thì là"],
            "1. Rửa sạch cá và măng tây. 2. Ướp cá với muối, thì là và một ít nước cốt chanh. \
             3. Áp chảo cá hồi với dầu ô liu cho đến khi chín vàng hai mặt. \
             4. Xào nhanh măng tây trên cùng chảo. Dùng kèm cơm gạo lứt.",
        ),
        recipe(
            "Khoai Lang Nướng Mật Ong",
            "Món ăn nhẹ nhàng, cung cấp carb phức hợp và tốt cho hệ tiêu hóa.",
            RecipeCategory::PainRelief,
            "40 phút",
            &["Khoai lang", "Mật ong", "Dầu ô liu", "Bột quế"],
            "1. Rửa sạch khoai, cắt thành từng miếng vừa ăn. \
             2. Trộn đều khoai với dầu ô liu, mật ong và bột quế. \
             3. Nướng ở 200°C trong 25-30 phút cho đến khi khoai mềm và có màu vàng đẹp.",
        ),
        recipe(
            "Sinh Tố Đu Đủ Gừng",
            "Đu đủ chứa enzyme papain hỗ trợ tiêu hóa, gừng giúp giảm buồn nôn.",
            RecipeCategory::AntiHeartburn,
            "5 phút",
            &[
                "Đu đủ chín",
                "Một lát gừng nhỏ",
                "Sữa chua không đường",
                "Nước lọc",
            ],
            "1. Gọt vỏ, bỏ hạt đu đủ và cắt nhỏ. 2. Cho tất cả nguyên liệu vào máy xay sinh tố. \
             3. Xay nhuyễn mịn và dùng ngay.",
        ),
    ]
}

/// Seed recipes in `category`, or all of them when `None`.
#[must_use]
pub fn by_category(category: Option<RecipeCategory>) -> Vec<Recipe> {
    let all = library();
    match category {
        Some(category) => all.into_iter().filter(|r| r.category == category).collect(),
        None => all,
    }
}
